use serde::Deserialize;
use tera::{Context, Tera};

use crate::Result;

/// OWNERS file written for the submitting vendor.
pub const OWNERS_TEMPLATE: &str = r#"chart:
  name: {{ chart_name }}
  shortDescription: Test chart for testing chart submission workflows.
publicPgpKey: null
users:
- githubUsername: {{ bot_name }}
vendor:
  label: {{ vendor }}
  name: {{ vendor }}
"#;

/// Chart name and version declared by a verification report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,
}

#[derive(Deserialize)]
struct Report {
    metadata: ReportMetadata,
}

#[derive(Deserialize)]
struct ReportMetadata {
    chart: ReportChart,
}

#[derive(Deserialize)]
struct ReportChart {
    name: String,
    version: String,
}

impl ChartMetadata {
    /// Read `metadata.chart.name` and `metadata.chart.version` from a report
    /// or report template.
    pub fn from_report(report: &str) -> Result<Self> {
        let report: Report = serde_yaml::from_str(report)?;
        Ok(Self {
            name: report.metadata.chart.name,
            version: report.metadata.chart.version,
        })
    }
}

fn render(name: &str, template: &str, context: &Context) -> Result<String> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(name, template)?;
    Ok(tera.render(name, context)?)
}

pub fn render_owners(
    chart_name: &str,
    bot_name: &str,
    vendor: &str,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("chart_name", chart_name);
    context.insert("bot_name", bot_name);
    context.insert("vendor", vendor);
    render("owners", OWNERS_TEMPLATE, &context)
}

/// Render a report template pointing at `repository` and `branch`.
pub fn render_report(
    template: &str,
    repository: &str,
    branch: &str,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("repository", repository);
    context.insert("branch", branch);
    render("report", template, &context)
}
