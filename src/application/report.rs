//! Markdown health report for a finished assessment.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::domain::Assessment;
use crate::Result;

/// Shown at the end of every report and in the UI footer.
pub const DISCLAIMER: &str = "This is a preliminary assessment system. Please consult with a qualified \
Ayurvedic practitioner for proper diagnosis and treatment.";

/// Render an assessment as a markdown report.
#[must_use]
pub fn generate_report(assessment: &Assessment) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, assessment);
    out
}

fn write_report(out: &mut String, a: &Assessment) -> std::fmt::Result {
    writeln!(out, "# Ayurvedic Health Assessment Report")?;
    writeln!(
        out,
        "Generated on: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    )?;

    writeln!(out, "## Patient Information")?;
    writeln!(out, "- **Age:** {} years", a.age)?;
    writeln!(out, "- **Gender:** {}", a.gender.display_name())?;
    writeln!(out, "- **Severity Level:** {}\n", a.severity.label())?;

    writeln!(out, "## Reported Symptoms")?;
    bullets(out, &a.symptoms)?;

    writeln!(out, "## Disease Prediction")?;
    writeln!(out, "- **Predicted Condition:** {}", a.prediction.disease)?;
    writeln!(out, "- **Confidence Score:** {}\n", a.prediction.confidence_percent())?;

    writeln!(out, "## Ayurvedic Recommendations")?;
    writeln!(out, "### Recommended Herbs")?;
    bullets(out, &a.recommendations.herbs)?;
    writeln!(out, "### Lifestyle Recommendations")?;
    bullets(out, &a.recommendations.lifestyle)?;
    writeln!(out, "### Dietary Guidelines")?;
    bullets(out, &a.recommendations.diet)?;

    writeln!(out, "## Disclaimer")?;
    write!(out, "{DISCLAIMER}")
}

fn bullets(out: &mut String, items: &[String]) -> std::fmt::Result {
    for item in items {
        writeln!(out, "- {item}")?;
    }
    writeln!(out)
}

/// Write the report to `<dir>/assessment-<id>.md`, creating `dir` if needed.
///
/// Unsaved assessments are named after their creation time instead.
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written.
pub fn export_report(assessment: &Assessment, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = match assessment.id {
        Some(id) => format!("assessment-{id}.md"),
        None => format!("assessment-{}.md", assessment.created_at.format("%Y%m%d%H%M%S")),
    };
    let path = dir.join(name);
    std::fs::write(&path, generate_report(assessment))?;
    tracing::info!("Exported report to {:?}", path);
    Ok(path)
}
