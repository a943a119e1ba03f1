//! Binary codec for cached file models.
//!
//! What the cache stores per file is the bincode encoding of its
//! [`FileModel`]. Decoding is fail-safe: a payload that no longer
//! decodes (format drift, partial write) reads as a miss and the file is
//! simply reparsed.

use reflet_cache::CacheError;
use reflet_model::FileModel;

/// Encodes a file model for cache storage.
pub fn encode_model(model: &FileModel) -> Result<Vec<u8>, CacheError> {
    bincode::serde::encode_to_vec(model, bincode::config::standard()).map_err(|e| {
        CacheError::Serialization {
            reason: e.to_string(),
        }
    })
}

/// Decodes a cached payload back into a file model.
///
/// Returns `None` for undecodable bytes.
pub fn decode_model(bytes: &[u8]) -> Option<FileModel> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .ok()
        .map(|(model, _)| model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflet_model::{ClassKind, Symbol};

    #[test]
    fn roundtrip() {
        let model = FileModel::new(vec![Symbol::ClassLike {
            name: "Request".to_string(),
            namespace: Some("Http".to_string()),
            kind: ClassKind::Class,
            line: 5,
        }]);
        let bytes = encode_model(&model).unwrap();
        let back = decode_model(&bytes).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn undecodable_bytes_read_as_none() {
        assert!(decode_model(b"\xff\xff\xff\xff not bincode").is_none());
    }

    #[test]
    fn empty_model_roundtrips() {
        let bytes = encode_model(&FileModel::default()).unwrap();
        assert_eq!(decode_model(&bytes).unwrap(), FileModel::default());
    }
}
