pub mod config;
pub mod logger;

use validator::ValidationErrors;

/// Joins every field's validation message into one `;`-separated line,
/// suitable for a toast description.
///
/// Fields are visited in name order so the output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
