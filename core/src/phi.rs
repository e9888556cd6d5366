//! Per-image PHI deny-list synthesis
//!
//! Burned-in identifiers usually mirror the instance's own metadata, so
//! every non-pixel element value becomes a candidate deny-list entry. Name
//! elements additionally expand into case and token variants: a detector
//! matching on any substring, case or token boundary still catches the
//! name.

use crate::tags;
use dicom_core::header::Header;
use dicom_core::{Tag, VR};
use dicom_object::InMemDicomObject;
use std::collections::HashSet;

/// Placeholder tokens that commonly carry sex/gender markers on film
const GENERIC_PHI: [&str; 8] = ["M", "[M]", "F", "[F]", "X", "[X]", "U", "[U]"];

/// One metadata element's textual content, possibly nested
#[derive(Debug, Clone, PartialEq)]
enum MetaValue {
    Text(String),
    Many(Vec<MetaValue>),
}

/// Text content of one non-pixel metadata element
#[derive(Debug, Clone)]
pub struct MetadataText {
    value: MetaValue,
    /// The element's field name contains "name"
    pub is_name: bool,
    /// The element's field name contains "patient"; carried for downstream
    /// policy, not used by the base deny-list algorithm
    pub is_patient: bool,
}

/// Set of literal strings handed to the detector as guaranteed-match patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhiDenyList {
    entries: HashSet<String>,
}

impl PhiDenyList {
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PhiDenyList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Retrieves the textual metadata of every non-pixel element
pub fn collect_text_metadata(dcm: &InMemDicomObject) -> Vec<MetadataText> {
    let mut out = Vec::new();
    for elem in dcm.iter() {
        let tag = elem.tag();
        if tag == tags::PIXEL_DATA {
            continue;
        }
        let Some(value) = element_value(elem.vr(), dcm, tag) else {
            continue;
        };
        let name = tags::element_name(tag).unwrap_or("").to_lowercase();
        out.push(MetadataText {
            value,
            is_name: name.contains("name"),
            is_patient: name.contains("patient"),
        });
    }
    out
}

fn element_value(vr: VR, dcm: &InMemDicomObject, tag: Tag) -> Option<MetaValue> {
    let elem = dcm.element(tag).ok()?;
    if vr == VR::SQ {
        let nested: Vec<MetaValue> = elem
            .items()
            .map(|items| items.iter().flat_map(dataset_values).collect())
            .unwrap_or_default();
        if nested.is_empty() {
            return None;
        }
        return Some(MetaValue::Many(nested));
    }
    let strings = elem.to_multi_str().ok()?;
    let mut texts: Vec<String> = strings
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    match texts.len() {
        0 => None,
        1 => Some(MetaValue::Text(texts.remove(0))),
        _ => Some(MetaValue::Many(
            texts.into_iter().map(MetaValue::Text).collect(),
        )),
    }
}

/// Values of every element in a nested dataset (sequence item)
fn dataset_values(dcm: &InMemDicomObject) -> Vec<MetaValue> {
    let mut values = Vec::new();
    for elem in dcm.iter() {
        let tag = elem.tag();
        if tag == tags::PIXEL_DATA {
            continue;
        }
        if let Some(value) = element_value(elem.vr(), dcm, tag) {
            values.push(value);
        }
    }
    values
}

/// Appends every leaf string of `value` to `out`
fn leaf_texts<'a>(value: &'a MetaValue, out: &mut Vec<&'a str>) {
    match value {
        MetaValue::Text(text) => out.push(text),
        MetaValue::Many(items) => {
            for item in items {
                leaf_texts(item, out);
            }
        }
    }
}

/// Expands a name into its redundant deny-list variants
///
/// The caret separator becomes a space, then four case variants are added
/// whole and split into individual tokens.
fn expand_name(text: &str, out: &mut Vec<String>) {
    let base = text.replace('^', " ");
    let variants = [
        base.clone(),
        base.to_uppercase(),
        base.to_lowercase(),
        title_case(&base),
    ];
    for variant in variants {
        out.extend(
            variant
                .split(' ')
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        );
        out.push(variant);
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the deny-list for an instance's metadata
///
/// Every metadata value is included as-is; names additionally expand into
/// case/token variants, and the generic sex-marker sentinels are always
/// present. Multi-valued entries are flattened one level per pass until no
/// nested entries remain, then everything is deduplicated as strings.
pub fn synthesize_deny_list(dcm: &InMemDicomObject) -> PhiDenyList {
    let metadata = collect_text_metadata(dcm);

    let mut working: Vec<MetaValue> = metadata.iter().map(|m| m.value.clone()).collect();

    let mut expanded = Vec::new();
    for item in &metadata {
        if item.is_name {
            let mut leaves = Vec::new();
            leaf_texts(&item.value, &mut leaves);
            for leaf in leaves {
                expand_name(leaf, &mut expanded);
            }
        }
    }
    working.extend(expanded.into_iter().map(MetaValue::Text));
    working.extend(GENERIC_PHI.iter().map(|s| MetaValue::Text(s.to_string())));

    // flatten one level per pass until no nested entries remain
    loop {
        let mut flattened = Vec::with_capacity(working.len());
        let mut changed = false;
        for value in working {
            match value {
                MetaValue::Many(items) => {
                    flattened.extend(items);
                    changed = true;
                }
                text => flattened.push(text),
            }
        }
        working = flattened;
        if !changed {
            break;
        }
    }

    working
        .into_iter()
        .filter_map(|value| match value {
            MetaValue::Text(text) => Some(text),
            MetaValue::Many(_) => None,
        })
        .collect()
}
