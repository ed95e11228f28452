// Shared data model for the backend proxy and the dashboard client

pub mod envelope;
pub mod query;
pub mod receipt;
pub mod series;

pub use envelope::OperationResult;
pub use query::{FieldValue, FormInput, LocationQuery};
pub use receipt::{ErrorBody, StoreReceipt};
pub use series::{
    CellValue, ChartSeries, Column, DailySeries, DailyVariable, NamedSeries, RawSeriesResponse,
    TableRow,
};
