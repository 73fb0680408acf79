//! Farcaster mini-app manifest served at `/.well-known/farcaster.json`.
//!
//! The document has two blocks:
//!
//! ```json
//! {
//!   "accountAssociation": { "header": "...", "payload": "...", "signature": "..." },
//!   "miniapp": {
//!     "version": "1",
//!     "name": "GIF Gallery",
//!     "iconUrl": "https://example.com/icon.png",
//!     "homeUrl": "https://example.com",
//!     "splashImageUrl": "https://example.com/splash.png",
//!     "splashBackgroundColor": "#000000"
//!   }
//! }
//! ```
//!
//! `accountAssociation` always carries all three credentials. `miniapp` goes
//! through [`with_valid_properties`] so unset values are left out instead of
//! being published empty. The manifest is rebuilt from config on every
//! request; building it cannot fail.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{
    DEFAULT_FARCASTER_HEADER, DEFAULT_FARCASTER_PAYLOAD, DEFAULT_FARCASTER_SIGNATURE,
    ManifestConfig,
};
use crate::properties::with_valid_properties;

/// Manifest schema version understood by Farcaster clients.
pub const MINIAPP_VERSION: &str = "1";

const ICON_PATH: &str = "/icon.png";
const SPLASH_PATH: &str = "/splash.png";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub account_association: AccountAssociation,
    pub miniapp: Map<String, Value>,
}

/// Signed proof that the domain belongs to a Farcaster account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

/// Build the manifest for the given config.
pub fn build_manifest(config: &ManifestConfig) -> Manifest {
    let base = config.public_url.trim_end_matches('/');

    let mut miniapp = Map::new();
    miniapp.insert("version".into(), MINIAPP_VERSION.into());
    miniapp.insert("name".into(), config.name.clone().into());
    miniapp.insert("iconUrl".into(), derive_url(base, ICON_PATH).into());
    miniapp.insert("homeUrl".into(), base.to_string().into());
    miniapp.insert("splashImageUrl".into(), derive_url(base, SPLASH_PATH).into());
    miniapp.insert(
        "splashBackgroundColor".into(),
        config.splash_background_color.clone().into(),
    );

    Manifest {
        account_association: AccountAssociation {
            header: or_fallback(&config.header, DEFAULT_FARCASTER_HEADER),
            payload: or_fallback(&config.payload, DEFAULT_FARCASTER_PAYLOAD),
            signature: or_fallback(&config.signature, DEFAULT_FARCASTER_SIGNATURE),
        },
        miniapp: with_valid_properties(miniapp),
    }
}

/// `base` + `path`, or nothing when there is no base to hang it on.
fn derive_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        String::new()
    } else {
        format!("{base}{path}")
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
