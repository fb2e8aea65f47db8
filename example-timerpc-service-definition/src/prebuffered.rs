mod give_server_time;
pub use give_server_time::*;
