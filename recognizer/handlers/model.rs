use std::io::Cursor;

use serde_json::json;
use tiny_http::Response;

use ferrite_mlp::Network;

/// `GET /model`
pub fn handle_get(network: &Network) -> Response<Cursor<Vec<u8>>> {
    crate::routes::json_response(200, &json!({ "layer_sizes": network.layer_sizes() }))
}
