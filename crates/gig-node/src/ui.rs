//! Small reusable UI pieces.

use eframe::egui;

pub fn error_label(ui: &mut egui::Ui, message: &str) {
    ui.colored_label(egui::Color32::from_rgb(220, 70, 70), message);
}

pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(6.0);
    ui.heading(text);
    ui.separator();
}

/// Block explorer address page for the chains the navbar knows about.
pub fn explorer_address_url(chain_id: &str, address: &str) -> String {
    let base = match chain_id {
        "0x89" => "https://polygonscan.com",
        "0x38" => "https://bscscan.com",
        _ => "https://etherscan.io",
    };
    format!("{base}/address/{address}")
}

pub fn open_in_browser(url: &str) {
    if let Err(err) = open::that(url) {
        tracing::warn!(%url, error = %err, "failed to open browser");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_url_follows_chain() {
        assert_eq!(
            explorer_address_url("0x89", "0xabc"),
            "https://polygonscan.com/address/0xabc"
        );
        assert_eq!(
            explorer_address_url("0x1", "0xabc"),
            "https://etherscan.io/address/0xabc"
        );
        // Unknown chains fall back to Etherscan.
        assert_eq!(
            explorer_address_url("0xdead", "0xabc"),
            "https://etherscan.io/address/0xabc"
        );
    }
}
