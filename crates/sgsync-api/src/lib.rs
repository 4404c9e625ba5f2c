// sgsync-api: Async HTTP clients for the firewall control plane + WAN address discovery

pub mod error;
pub mod firewall;
pub mod transport;
pub mod types;
pub mod wanip;

pub use error::Error;
pub use firewall::FirewallClient;
pub use transport::{TlsMode, TransportConfig};
pub use wanip::WanIpResolver;
