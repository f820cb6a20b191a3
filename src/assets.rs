//! Per-session image cache.
//!
//! Every image is optional.  [`build_asset_cache`] runs when a session starts
//! and only asks the [`AssetServer`] for files that actually exist under
//! `assets/`; anything missing is drawn as a flat coloured placeholder.

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;

use crate::cargo::CargoKind;

/// Directory the asset server reads from.
pub const ASSET_ROOT: &str = "assets";

pub const MEMBRANE_IMAGE: &str = "images/AP.png";
pub const BACKGROUND_IMAGE: &str = "images/full_background.png";

/// Image handles for the current session.
#[derive(Resource, Debug, Default, Clone)]
pub struct AssetCache {
    cargo: HashMap<CargoKind, Handle<Image>>,
    pub membrane: Option<Handle<Image>>,
    pub background: Option<Handle<Image>>,
}

impl AssetCache {
    #[inline]
    pub fn cargo_image(&self, kind: CargoKind) -> Option<Handle<Image>> {
        self.cargo.get(&kind).cloned()
    }

    /// Number of images that resolved to a file.
    pub fn loaded(&self) -> usize {
        self.cargo.len()
            + usize::from(self.membrane.is_some())
            + usize::from(self.background.is_some())
    }
}

/// Whether `relative` names a regular file under `root`.
pub fn image_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).is_file()
}

fn load_if_present(server: &AssetServer, path: &'static str) -> Option<Handle<Image>> {
    if image_exists(Path::new(ASSET_ROOT), path) {
        Some(server.load(path))
    } else {
        debug!("No {ASSET_ROOT}/{path}; using a placeholder");
        None
    }
}

/// Resolve every image the renderer may ask for.
pub fn build_asset_cache(mut commands: Commands, asset_server: Res<AssetServer>) {
    let mut cache = AssetCache::default();
    for kind in CargoKind::ALL {
        if let Some(handle) = load_if_present(&asset_server, kind.spec().image) {
            cache.cargo.insert(kind, handle);
        }
    }
    cache.membrane = load_if_present(&asset_server, MEMBRANE_IMAGE);
    cache.background = load_if_present(&asset_server, BACKGROUND_IMAGE);

    eprintln!(
        "[SETUP] Asset cache: {} of {} images found",
        cache.loaded(),
        CargoKind::ALL.len() + 2
    );
    commands.insert_resource(cache);
}
