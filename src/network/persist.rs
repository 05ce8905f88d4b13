//! Compressed model artifact.
//!
//! A model is stored as one gzip-compressed JSON object with named entries:
//!
//! ```text
//! layer_sizes   [784, 16, 16, 10]
//! weights_0     [[...], ...]    (layer_sizes[1] rows of layer_sizes[0] values)
//! biases_0      [...]           (layer_sizes[1] values)
//! weights_1     ...
//! ```
//!
//! Entries other than these are ignored on load, so the artifact can carry
//! extra annotations without breaking older readers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

const LAYER_SIZES: &str = "layer_sizes";

fn weights_key(i: usize) -> String {
    format!("weights_{}", i)
}

fn biases_key(i: usize) -> String {
    format!("biases_{}", i)
}

impl Network {
    /// Writes the architecture and every weight/bias to `path`.
    ///
    /// Missing parent directories are created. A NaN or infinite parameter
    /// cannot be stored, so it is reported as `Artifact` before any file is
    /// touched.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        for (i, (w, b)) in self.weights().iter().zip(self.biases()).enumerate() {
            if !w.data.iter().flatten().chain(b).all(|v| v.is_finite()) {
                return Err(NetError::Artifact(format!(
                    "transition {} holds a non-finite weight or bias",
                    i
                )));
            }
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut entries = Map::new();
        entries.insert(LAYER_SIZES.to_owned(), serde_json::to_value(self.layer_sizes())?);
        for (i, (w, b)) in self.weights().iter().zip(self.biases()).enumerate() {
            entries.insert(weights_key(i), serde_json::to_value(&w.data)?);
            entries.insert(biases_key(i), serde_json::to_value(b)?);
        }

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, &Value::Object(entries))?;
        encoder.finish()?.flush()?;

        debug!(path = %path.display(), layers = ?self.layer_sizes(), "saved model");
        Ok(())
    }

    /// Reads a model written by [`Network::save_model`].
    ///
    /// Builds a network with the stored `layer_sizes`, then overwrites its
    /// parameters with the stored ones. Exactly `layer_sizes.len() - 1`
    /// weight/bias pairs are read.
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut json = Vec::new();
        GzDecoder::new(BufReader::new(file)).read_to_end(&mut json)?;

        let network = Network::from_entries(serde_json::from_slice(&json)?)?;
        debug!(path = %path.display(), layers = ?network.layer_sizes(), "loaded model");
        Ok(network)
    }

    fn from_entries(mut entries: Map<String, Value>) -> Result<Network> {
        let layer_sizes: Vec<usize> = take_entry(&mut entries, LAYER_SIZES)?;
        let mut network = Network::new(layer_sizes)?;

        let transitions = network.transitions();
        let mut weights = Vec::with_capacity(transitions);
        let mut biases = Vec::with_capacity(transitions);
        for i in 0..transitions {
            let rows: Vec<Vec<f64>> = take_entry(&mut entries, &weights_key(i))?;
            weights.push(Matrix::from_data(rows));
            biases.push(take_entry(&mut entries, &biases_key(i))?);
        }

        network.set_parameters(weights, biases)?;
        Ok(network)
    }
}

fn take_entry<T: DeserializeOwned>(entries: &mut Map<String, Value>, key: &str) -> Result<T> {
    let value = entries
        .remove(key)
        .ok_or_else(|| NetError::Artifact(format!("missing entry '{}'", key)))?;
    serde_json::from_value(value)
        .map_err(|e| NetError::Artifact(format!("entry '{}': {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_path(name: &str) -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "ferrite-mlp-persist-{}-{}-{}.json.gz",
            std::process::id(),
            n,
            name
        ))
    }

    fn write_artifact(path: &Path, value: &Value) {
        let file = File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(&mut encoder, value).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn round_trip_preserves_everything() {
        let path = temp_path("round-trip");
        let net = Network::with_seed(vec![6, 4, 3], 11).unwrap();
        net.save_model(&path).unwrap();
        let loaded = Network::load_model(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.layer_sizes(), net.layer_sizes());
        assert_eq!(loaded, net);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested-dir");
        let path = dir.join("inner").join("model.json.gz");
        Network::new(vec![2, 2]).unwrap().save_model(&path).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_ignores_unrelated_entries() {
        let path = temp_path("extra");
        write_artifact(
            &path,
            &serde_json::json!({
                "layer_sizes": [2, 1],
                "weights_0": [[0.5, -0.5]],
                "biases_0": [0.25],
                "description": "digits",
                "weights_7": [[1.0]],
            }),
        );
        let net = Network::load_model(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(net.layer_sizes(), &[2, 1]);
        assert_eq!(net.weights()[0].data, vec![vec![0.5, -0.5]]);
        assert_eq!(net.biases()[0], vec![0.25]);
    }

    #[test]
    fn load_rejects_shapes_disagreeing_with_layer_sizes() {
        let path = temp_path("bad-shape");
        write_artifact(
            &path,
            &serde_json::json!({
                "layer_sizes": [2, 1],
                "weights_0": [[0.5, -0.5, 1.0]],
                "biases_0": [0.25],
            }),
        );
        let result = Network::load_model(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(NetError::ShapeMismatch(_))));
    }

    #[test]
    fn load_rejects_missing_entries() {
        let path = temp_path("missing");
        write_artifact(
            &path,
            &serde_json::json!({ "layer_sizes": [2, 3, 1], "weights_0": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]] }),
        );
        let result = Network::load_model(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(NetError::Artifact(_))));
    }

    #[test]
    fn save_refuses_non_finite_parameters() {
        let path = temp_path("diverged");
        let mut net = Network::new(vec![2, 1]).unwrap();
        net.weights[0].data[0][1] = f64::NAN;
        assert!(matches!(net.save_model(&path), Err(NetError::Artifact(_))));
        assert!(!path.exists());

        net.weights[0].data[0][1] = 0.0;
        net.biases[0][0] = f64::INFINITY;
        assert!(matches!(net.save_model(&path), Err(NetError::Artifact(_))));
        assert!(!path.exists());
    }

    #[test]
    fn load_of_missing_file_is_io_error() {
        let result = Network::load_model(temp_path("does-not-exist"));
        assert!(matches!(result, Err(NetError::Io(_))));
    }
}
