//! Snapshot tests for the template save payload.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::TestTemplateBuilder;
use certdesigner::types::TemplateRecord;

#[test]
fn snapshot_template_record() {
    let template = TestTemplateBuilder::new()
        .with_background("bg.png")
        .with_static_text("title", "Certificate", (100.0, 50.0))
        .with_image("logo", None, (20.0, 20.0, 150.0, 150.0))
        .build();
    let record = TemplateRecord::from_template("Workshop", &template);

    insta::assert_snapshot!(record.to_json().unwrap(), @r###"
    {
      "name": "Workshop",
      "backgroundReference": "bg.png",
      "templateData": {
        "backgroundReference": "bg.png",
        "elements": [
          {
            "id": "title",
            "x": 100.0,
            "y": 50.0,
            "width": 200.0,
            "height": 40.0,
            "type": "staticText",
            "content": "Certificate",
            "fontSize": 16.0,
            "fontFamily": "Arial",
            "color": "#000000",
            "textAlign": "center"
          },
          {
            "id": "logo",
            "x": 20.0,
            "y": 20.0,
            "width": 150.0,
            "height": 150.0,
            "type": "image",
            "imageReference": null
          }
        ],
        "canvasWidth": 800,
        "canvasHeight": 566
      }
    }
    "###);
}

#[test]
fn snapshot_qr_element_keeps_data_template() {
    let template = TestTemplateBuilder::new()
        .with_qr("qr", "https://verify.test/{{id}}", (600.0, 400.0, 100.0, 100.0))
        .build();

    insta::assert_snapshot!(serde_json::to_string_pretty(&template.elements[0]).unwrap(), @r###"
    {
      "id": "qr",
      "x": 600.0,
      "y": 400.0,
      "width": 100.0,
      "height": 100.0,
      "type": "qrCode",
      "imageReference": null,
      "data": "https://verify.test/{{id}}"
    }
    "###);
}
