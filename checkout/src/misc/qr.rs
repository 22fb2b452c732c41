use gateway::ChargeResult;
use url::Url;

const QR_RENDERER_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Image the storefront can show as is: the gateway's own image when it sent
/// one, otherwise a rendered QR of the copy-paste code.
pub fn display_qr_source(result: &ChargeResult) -> String {
    if !result.qr_image_source.is_empty() {
        return result.qr_image_source.clone();
    }
    match result.pix_code() {
        Some(code) => {
            Url::parse_with_params(QR_RENDERER_URL, &[("size", "400x400"), ("data", code)])
                .map(String::from)
                .unwrap_or_default()
        }
        None => String::new(),
    }
}
