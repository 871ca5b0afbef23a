/// UI layer: the dashboard sections and the column chart.
pub mod plot;
pub mod sections;
