//! Asset loading
//!
//! The charset sheet must be fetched and decoded before the first frame
//! runs.

#[cfg(target_arch = "wasm32")]
pub use wasm::load_charset;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    /// Fetch and decode the charset sheet. Resolves once the image is
    /// ready to blit.
    pub async fn load_charset(src: &str) -> Result<HtmlImageElement, JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(src);
        JsFuture::from(image.decode()).await?;
        Ok(image)
    }
}
