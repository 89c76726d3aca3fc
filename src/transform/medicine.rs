use crate::entities::medicine::MedicineInfo;
use crate::sources::openfda::LabelRecord;
use crate::utils::query::encode_component;
use crate::utils::serde::StringOrVec;

/// Placeholder shown for a label section with no usable text.
pub const NOT_FOUND: &str = "Data not found";

const IMAGE_SEARCH_BASE: &str = "https://source.unsplash.com/160x160/?";

/// Generic tablet icon used when label data exists but nothing in it is usable.
pub const FALLBACK_ICON_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/8/86/Tablet_icon.svg/200px-Tablet_icon.svg.png";

const LABEL_SEPARATOR: &str = "; ";

/// Keyword image-search URL for a medicine name.
pub fn image_search_url(name: &str) -> String {
    format!(
        "{IMAGE_SEARCH_BASE}{}",
        encode_component(&format!("{} medicine", name.trim()))
    )
}

fn section_text(section: &StringOrVec) -> Option<String> {
    let entries = section.non_blank();
    if entries.is_empty() {
        None
    } else {
        Some(entries.join(LABEL_SEPARATOR))
    }
}

fn text_or_not_found(section: &StringOrVec) -> String {
    section_text(section).unwrap_or_else(|| NOT_FOUND.to_string())
}

fn precautions_text(record: &LabelRecord) -> String {
    [
        &record.precautions,
        &record.precautions_and_warnings,
        &record.warnings,
    ]
    .into_iter()
    .find_map(section_text)
    .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Maps one label record into display fields, paired with `image`.
pub fn from_label(record: &LabelRecord, image: String) -> MedicineInfo {
    MedicineInfo {
        purpose: text_or_not_found(&record.indications_and_usage),
        dosage: text_or_not_found(&record.dosage_and_administration),
        side_effects: text_or_not_found(&record.adverse_reactions),
        precautions: precautions_text(record),
        image,
    }
}

/// All four text fields set to the placeholder.
pub fn not_found(image: String) -> MedicineInfo {
    MedicineInfo {
        purpose: NOT_FOUND.to_string(),
        dosage: NOT_FOUND.to_string(),
        side_effects: NOT_FOUND.to_string(),
        precautions: NOT_FOUND.to_string(),
        image,
    }
}
