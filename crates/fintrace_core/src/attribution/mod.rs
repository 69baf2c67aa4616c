//! Attribution of a reconciled month back to its causes
//!
//! Each attributor explains one of the reconciled figures:
//! - `flows` - operating flow as categorized line items
//! - `transfers` - the inter-bucket transfer as labeled transfer records
//! - `growth` - the market-return impact as per-asset-class contributions

pub mod flows;
pub mod growth;
pub mod transfers;

pub use flows::{FlowAttribution, SYSTEM_ADJUSTMENTS, attribute_flows, classify_event};
pub use growth::{GrowthBasis, attribute_growth};
pub use transfers::{EventTransfers, attribute_transfers, scan_event_transfers, transfer_reason};
