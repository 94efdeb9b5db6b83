pub mod correlator;
pub mod packet_types;
pub mod render;
pub mod urb;

// Re-export commonly used types for easier access
pub use self::correlator::{Correlation, TransactionCorrelator};
pub use self::packet_types::{HidRequest, UrbKind};
pub use self::render::{render_transaction, Transaction};
pub use self::urb::{Urb, UrbError, URB_HEADER_LEN};
