//! Human-readable wording for resolution outcomes.

use std::fmt::{Display, Formatter};

use crate::error::ResolutionError;
use crate::resolve::Advisory;

/// Where users can read about the upstream runtime support policy.
pub const RUNTIME_SUPPORT_POLICY_URL: &str =
    "https://docs.aws.amazon.com/lambda/latest/dg/runtime-support-policy.html";

/// Renders a resolution error as a multi-line terminal message.
pub fn render(err: &ResolutionError) -> String {
    let auto = err.is_auto_selected();
    match err {
        ResolutionError::InvalidRange {
            requested_range,
            supported,
            ..
        } => {
            let intro = if auto {
                "This project is using an invalid version of Node.js and must be changed."
                    .to_string()
            } else {
                format!(
                    "Found `engines` in `package.json` with an invalid Node.js version range: {requested_range}"
                )
            };
            format!(
                "{intro}\nPlease set `engines` in `package.json` to one of the supported Node.js version ranges: {}",
                quoted_list(supported)
            )
        }
        ResolutionError::Discontinued {
            selection,
            requested_range,
            ..
        } => {
            let intro = match requested_range {
                Some(range) if !auto => format!(
                    "Found `engines` in `package.json` with a discontinued Node.js version range: {range}"
                ),
                _ => format!(
                    "This project is using a discontinued version of Node.js ({}) and must be upgraded.",
                    selection.range
                ),
            };
            format!(
                "{intro}\n\
                 Please set `engines` in `package.json` to use a newer Node.js version range.\n\
                 This change is the result of a decision made by an upstream infrastructure provider (AWS).\n\
                 Read more: {RUNTIME_SUPPORT_POLICY_URL}"
            )
        }
    }
}

fn quoted_list(items: &[String]) -> String {
    let quoted = items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>();
    format!("[{}]", quoted.join(", "))
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node.js version {} is deprecated and will be discontinued on {}. \
             Deployments created on or after {} will fail to build. \
             Please set `engines` in `package.json` to use a newer Node.js version range.",
            self.range, self.discontinued_at, self.discontinued_at
        )
    }
}
