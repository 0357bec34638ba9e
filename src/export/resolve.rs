//! Content resolution - participant values into a template copy.

use crate::participant::ParticipantRecord;
use crate::types::{CertificateTemplate, ElementId, ElementKind};
use std::collections::HashMap;
use tracing::debug;

/// A template with every variable text substituted, plus the payloads of
/// QR elements that generate their code at export time.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub template: CertificateTemplate,
    pub qr_payloads: HashMap<ElementId, String>,
}

/// Value for `key`, or the element's literal `fallback` when the record
/// lacks it (or holds only whitespace).
pub fn resolve_variable(key: &str, fallback: &str, record: &ParticipantRecord) -> String {
    record.get(key).unwrap_or(fallback).to_string()
}

/// Replace `{{key}}` placeholders in `text`. Unknown keys stay literal.
pub fn substitute_placeholders(text: &str, record: &ParticipantRecord) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match record.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Copy `template` with participant values substituted. Never fails.
pub fn resolve_content(template: &CertificateTemplate, record: &ParticipantRecord) -> ResolvedTemplate {
    let mut resolved = template.clone();
    let mut qr_payloads = HashMap::new();

    for element in &mut resolved.elements {
        match &mut element.kind {
            ElementKind::VariableText {
                variable_key,
                content,
                ..
            } => {
                let value = resolve_variable(variable_key, content, record);
                if record.get(variable_key).is_none() {
                    debug!(element_id = %element.id, key = %variable_key, "Variable missing, using literal content");
                }
                *content = value;
            }
            ElementKind::QrCode {
                data: Some(data), ..
            } => {
                let payload = substitute_placeholders(data, record);
                if !payload.is_empty() {
                    qr_payloads.insert(element.id.clone(), payload);
                }
            }
            _ => {}
        }
    }

    ResolvedTemplate {
        template: resolved,
        qr_payloads,
    }
}
