/// Chart builders: map a filtered [`Table`](crate::data::model::Table) into
/// the plain-data spec one chart type expects.  Specs are serializable and
/// carry everything the renderer needs (labels, values, hex colors); the
/// builders never touch the UI.
///
/// Every builder returns `Err(ChartError::NoData)` instead of producing an
/// empty or degenerate spec.

pub mod bar;
pub mod heatmap;
pub mod pie;
pub mod sankey;
pub mod scatter;
pub mod sunburst;
pub mod waterfall;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// The filtered table has nothing to show; rendered as an
    /// informational message, not a failure.
    #[error("No data for the current selection.")]
    NoData,

    #[error("Missing column '{0}'.")]
    MissingColumn(String),

    /// A chart needs a widget selection the user has not made yet.
    #[error("Select at least one {0} first.")]
    MissingSelection(&'static str),
}
