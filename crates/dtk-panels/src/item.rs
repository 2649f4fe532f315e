//! Tabular view of panel items.

/// An item a panel can print as one table row.
pub trait PanelItem {
    /// Column headers, in row order.
    fn headers() -> &'static [&'static str];

    /// Cells for this item, one per header.
    fn row(&self) -> Vec<String>;
}
