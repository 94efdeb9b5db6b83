use std::fmt;

use itertools::Itertools;

use super::urb::Urb;

const BYTES_PER_LINE: usize = 8;

/// Hex dump with eight bytes per line, continuation lines indented.
pub fn hex_pretty_print(bytes: &[u8]) -> String {
    bytes
        .chunks(BYTES_PER_LINE)
        .map(|line| line.iter().map(|b| format!("{:02x}", b)).join(" "))
        .join("\n    ")
}

/// Text form of one request and its reply, as written to a `.tx` file
pub struct Transaction<'a>(pub &'a Urb);

impl fmt::Display for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;
        writeln!(f, "<")?;
        writeln!(f, "URB Transaction (ID: {})", request.id)?;
        writeln!(f, "{} {:02x}", request.request_type, request.report_id)?;
        writeln!(f, "Data Sent ({} bytes):", request.data_length)?;
        writeln!(f, "    {}", hex_pretty_print(&request.payload))?;
        match request.reply() {
            Some(reply) => {
                writeln!(f, "Data Recieved ({} bytes)", reply.payload.len())?;
                writeln!(f, "    {}", hex_pretty_print(&reply.payload))?;
            }
            None => {
                writeln!(f, "No reply found!")?;
                writeln!(f)?;
            }
        }
        writeln!(f, ">")
    }
}

pub fn render_transaction(request: &Urb) -> String {
    Transaction(request).to_string()
}
