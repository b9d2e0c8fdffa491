//! Terminal rendering for diagnoses, the symptom vocabulary, and model info.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use healthsync_ai::{InferenceService, metrics};
use healthsync_core::{Diagnosis, ModelSource, display_name};

pub const DISCLAIMER: &str = "\
MEDICAL DISCLAIMER
This tool is for informational and educational purposes only. It is not a
substitute for professional medical advice, diagnosis, or treatment. Always
seek the advice of a qualified health provider with any questions about a
medical condition. Never disregard professional advice or delay seeking it
because of something this tool reports.";

const NEXT_STEPS: &[&str] = &[
    "Consult a healthcare provider",
    "Monitor your symptoms",
    "Rest and stay hydrated",
    "Seek emergency care if symptoms worsen",
];

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

const BAR_WIDTH: usize = 30;

/// Print the result card for one diagnosis.
pub fn print_result_card(diagnosis: &Diagnosis, now: DateTime<Local>) {
    let Some(primary) = diagnosis.primary() else {
        println!("No prediction available.");
        return;
    };

    println!("=== Primary Indication ===");
    println!("{}", primary.label);
    println!();
    println!("  {:<18} {:.1}%", "Confidence", primary.percent());
    println!("  {:<18} {}", "Symptoms analyzed", diagnosis.symptom_count);
    println!("  {:<18} {}", "Timestamp", now.format(TIMESTAMP_FMT));
    if diagnosis.source == ModelSource::Fallback {
        println!("  {:<18} {}", "Model", "demo fallback (no trained artifact)");
    }
    println!();

    println!("Differential");
    for (rank, p) in diagnosis.predictions.iter().enumerate() {
        println!(
            "  {}. {:<28} {:>5.1}%  {}",
            rank + 1,
            p.label,
            p.percent(),
            bar(p.confidence)
        );
    }
    println!();

    println!("Recommended next steps");
    for step in NEXT_STEPS {
        println!("  - {step}");
    }
}

/// Plain-text clinical report for download.
pub fn render_report(diagnosis: &Diagnosis, now: DateTime<Local>) -> String {
    let mut out = String::from("HealthSync Clinical Report\n\n");
    if let Some(primary) = diagnosis.primary() {
        let _ = writeln!(out, "Primary Prediction: {}", primary.label);
        let _ = writeln!(out, "Confidence: {:.1}%", primary.percent());
    }
    let _ = writeln!(out, "Timestamp: {}", now.format(TIMESTAMP_FMT));
    out
}

/// Print the vocabulary alphabetically with display names.
pub fn print_symptoms(service: &InferenceService) {
    let vocab = service.sorted_vocabulary();
    println!("{} symptoms ({} model)", vocab.len(), service.source().as_str());
    for symptom in vocab {
        println!("  {:<28} {}", symptom, display_name(symptom));
    }
}

pub fn print_model_info(service: &InferenceService) {
    println!("=== Model ===");
    println!("  {:<18} {}", "Source", service.source().as_str());
    println!("  {:<18} {}", "Diseases", service.classes().len());
    println!("  {:<18} {}", "Symptoms", service.vocabulary().len());

    let m = service.metrics();
    if m.is_empty() {
        println!("  {:<18} (none recorded)", "Metrics");
        return;
    }
    for (name, value) in m {
        let label = match name.as_str() {
            metrics::ACCURACY => "Accuracy",
            metrics::F1_SCORE => "F1 score",
            other => other,
        };
        println!("  {:<18} {:.1}%", label, value * 100.0);
    }
}

fn bar(confidence: f64) -> String {
    let filled = (confidence.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use healthsync_core::Prediction;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    fn diagnosis() -> Diagnosis {
        Diagnosis {
            predictions: vec![
                Prediction::new("Influenza", 0.8126),
                Prediction::new("Migraine", 0.1874),
            ],
            symptom_count: 3,
            source: ModelSource::Trained,
        }
    }

    #[test]
    fn report_layout() {
        assert_eq!(
            render_report(&diagnosis(), at()),
            "HealthSync Clinical Report\n\n\
             Primary Prediction: Influenza\n\
             Confidence: 81.3%\n\
             Timestamp: 2024-03-05 14:07:09\n"
        );
    }

    #[test]
    fn report_without_predictions_keeps_header() {
        let d = Diagnosis {
            predictions: vec![],
            symptom_count: 1,
            source: ModelSource::Fallback,
        };
        let report = render_report(&d, at());
        assert!(report.starts_with("HealthSync Clinical Report\n\n"));
        assert!(!report.contains("Primary Prediction"));
    }

    #[test]
    fn bar_scales_with_confidence() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(1.0).len(), BAR_WIDTH);
        assert_eq!(bar(0.5).len(), BAR_WIDTH / 2);
        assert_eq!(bar(2.0).len(), BAR_WIDTH);
    }
}
