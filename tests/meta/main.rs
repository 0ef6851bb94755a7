//! Repository layout, manifest and packaged data checks

mod manifest;
