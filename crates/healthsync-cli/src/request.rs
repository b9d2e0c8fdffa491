//! Checks applied to a `predict` request before and around the model call.

use anyhow::bail;
use healthsync_ai::PredictError;
use healthsync_core::{FeatureSchema, SymptomSelection};

use crate::display::DISCLAIMER;

/// Fail unless the user acknowledged the medical disclaimer.
///
/// Prints the disclaimer on refusal.
pub fn require_consent(accepted: bool) -> anyhow::Result<()> {
    if accepted {
        return Ok(());
    }
    eprintln!("{DISCLAIMER}");
    eprintln!();
    bail!("re-run with --accept-disclaimer to acknowledge the disclaimer");
}

/// Build a selection from raw arguments, trimming blanks.
///
/// Returns [`PredictError::EmptySelection`] when nothing is left, before any
/// model is loaded.
pub fn parse_selection<S: AsRef<str>>(args: &[S]) -> anyhow::Result<SymptomSelection> {
    let selection: SymptomSelection = args
        .iter()
        .flat_map(|a| a.as_ref().split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if selection.is_empty() {
        eprintln!("Please select at least one symptom.");
        eprintln!("Run `healthsync symptoms` to list the vocabulary.");
        bail!(PredictError::EmptySelection);
    }
    Ok(selection)
}

/// Warning line for selected symptoms the model does not know, if any.
pub fn unknown_warning(vocabulary: &FeatureSchema, selection: &SymptomSelection) -> Option<String> {
    let unknown = vocabulary.unknown(selection);
    if unknown.is_empty() {
        return None;
    }
    Some(format!(
        "warning: ignoring unknown symptom(s): {}",
        unknown.join(", ")
    ))
}
