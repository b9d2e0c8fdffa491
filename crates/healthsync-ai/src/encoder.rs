//! Symptom selection → fixed-order 0/1 feature vector.

use healthsync_core::{FeatureSchema, SymptomSelection};

/// Encode `selection` against `schema`: `out[i] == 1.0` iff `schema[i]` is selected.
///
/// Symptoms the schema does not contain are ignored; use
/// [`FeatureSchema::unknown`] to find them.
pub fn encode(schema: &FeatureSchema, selection: &SymptomSelection) -> Vec<f64> {
    schema
        .iter()
        .map(|name| if selection.contains(name) { 1.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn single_selection() {
        let s = schema(&["fever", "cough", "fatigue"]);
        let v = encode(&s, &SymptomSelection::from_iter(["cough"]));
        assert_eq!(v, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn position_matches_membership() {
        let s = schema(&["a", "b", "c", "d", "e"]);
        let sel = SymptomSelection::from_iter(["e", "a", "c"]);
        let v = encode(&s, &sel);
        assert_eq!(v.len(), s.len());
        for (i, name) in s.iter().enumerate() {
            let expected = if sel.contains(name) { 1.0 } else { 0.0 };
            assert_eq!(v[i], expected, "position {i} ({name})");
        }
    }

    #[test]
    fn unknown_symptoms_are_ignored() {
        let s = schema(&["fever", "cough"]);
        let v = encode(&s, &SymptomSelection::from_iter(["cough", "hiccups"]));
        assert_eq!(v, vec![0.0, 1.0]);

        let only_unknown = encode(&s, &SymptomSelection::from_iter(["hiccups"]));
        assert_eq!(only_unknown, vec![0.0, 0.0]);
    }

    #[test]
    fn encoding_is_idempotent() {
        let s = schema(&["fever", "cough", "fatigue"]);
        let sel = SymptomSelection::from_iter(["fatigue", "fever"]);
        assert_eq!(encode(&s, &sel), encode(&s, &sel));
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let s = schema(&["fever", "cough"]);
        assert_eq!(encode(&s, &SymptomSelection::new()), vec![0.0, 0.0]);
    }
}
