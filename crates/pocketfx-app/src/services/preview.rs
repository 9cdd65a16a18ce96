// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview encoding. The webview shows the rendered image through an inline
// PNG data URL, so no temporary files are written.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use pocketfx_core::error::Result;
use pocketfx_filters::FloatImage;
use pocketfx_filters::image_io::encode_png;

const PNG_PREFIX: &str = "data:image/png;base64,";

/// Encode `image` as a `data:image/png;base64,…` URL.
pub fn data_url(image: &FloatImage) -> Result<String> {
    let png = encode_png(image)?;
    let mut url = String::with_capacity(PNG_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_PREFIX);
    STANDARD.encode_string(&png, &mut url);
    Ok(url)
}
