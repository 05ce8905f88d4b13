use std::io::Cursor;

use serde::{Deserialize, Serialize};
use serde_json::to_value;
use tiny_http::{Request, Response};
use tracing::info;

use ferrite_mlp::data::argmax;
use ferrite_mlp::Network;

use crate::routes::{error_response, json_response};
use crate::util::image::{image_bytes_to_grayscale_input, square_side};
use crate::util::query::{parse_query, query_flag};

/// JSON body carrying raw canvas values, row-major, in `[0, 1]`.
#[derive(Debug, Deserialize)]
struct PixelsBody {
    pixels: Vec<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Recognition {
    pub digit: usize,
    pub confidence: f64,
    pub outputs: Vec<f64>,
}

// ---------------------------------------------------------------------------
// POST /recognize
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, query: &str, network: &Network) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        return error_response(400, &format!("could not read request body: {}", e));
    }
    if body.is_empty() {
        return error_response(400, "request body is empty");
    }

    let pixels = if content_type.starts_with("application/json") {
        match serde_json::from_slice::<PixelsBody>(&body) {
            Ok(parsed) => parsed.pixels,
            Err(e) => return error_response(400, &format!("invalid JSON body: {}", e)),
        }
    } else {
        let side = match square_side(network.input_size()) {
            Some(side) => side,
            None => {
                return error_response(
                    422,
                    &format!("model input size {} is not a square image", network.input_size()),
                )
            }
        };
        match image_bytes_to_grayscale_input(&body, side, side) {
            Ok(pixels) => pixels,
            Err(e) => return error_response(400, &format!("could not decode image: {}", e)),
        }
    };

    let invert = query_flag(&parse_query(query), "invert").unwrap_or(true);
    match recognize(network, pixels, invert) {
        Ok(result) => {
            info!(digit = result.digit, confidence = result.confidence, "recognized");
            match to_value(&result) {
                Ok(value) => json_response(200, &value),
                Err(e) => error_response(500, &e.to_string()),
            }
        }
        Err(message) => error_response(422, &message),
    }
}

/// Classifies one canvas.
///
/// Drawings are dark strokes on a light background while the training images
/// are light on dark, so by default each value `v` becomes `1 - v` first.
pub fn recognize(network: &Network, mut pixels: Vec<f64>, invert: bool) -> Result<Recognition, String> {
    if invert {
        pixels.iter_mut().for_each(|v| *v = 1.0 - *v);
    }
    let outputs = network.predict(&pixels).map_err(|e| e.to_string())?;
    let digit = argmax(&outputs);
    Ok(Recognition {
        digit,
        confidence: outputs[digit],
        outputs,
    })
}
