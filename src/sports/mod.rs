//! Per-sport endpoint tables
//!
//! Each sport module is a declaration only: its base URL, storage name and
//! the endpoints it caches. [`sport_api!`] expands such a declaration into
//! typed [`Endpoint`](crate::api::Endpoint) constants, the store
//! [`MANIFEST`](football::MANIFEST), the untyped `ROUTES` table and the
//! `SPORT` descriptor, so every sport shares the one generic store engine.

use clap::ValueEnum;

use crate::api::SportDescriptor;

macro_rules! sport_api {
    (
        name: $name:literal,
        base_url: $base_url:literal,
        storage: $storage:literal,
        singleton {
            $( $s_const:ident : $s_ty:ty => $s_ns:literal @ $s_path:literal ),* $(,)?
        }
        keyed {
            $( $k_const:ident : $k_ty:ty => $k_ns:literal @ $k_path:literal ),* $(,)?
        }
    ) => {
        $(
            pub const $s_const: $crate::api::Endpoint<$crate::cache::SingletonSlot<$s_ty>> =
                $crate::api::Endpoint::new($s_path, $crate::cache::SingletonSlot::new($s_ns));
        )*
        $(
            pub const $k_const: $crate::api::Endpoint<$crate::cache::KeyedSlot<$k_ty>> =
                $crate::api::Endpoint::new($k_path, $crate::cache::KeyedSlot::new($k_ns));
        )*

        pub const ROUTES: &[$crate::api::Route] = &[
            $( $crate::api::Route::new($s_ns, $s_path), )*
            $( $crate::api::Route::new($k_ns, $k_path), )*
        ];

        pub const MANIFEST: $crate::cache::StoreManifest = $crate::cache::StoreManifest {
            storage_name: $storage,
            namespaces: &[
                $( $crate::cache::NamespaceSpec::singleton($s_ns), )*
                $( $crate::cache::NamespaceSpec::keyed($k_ns), )*
            ],
        };

        pub const SPORT: $crate::api::SportDescriptor = $crate::api::SportDescriptor {
            name: $name,
            base_url: $base_url,
            manifest: MANIFEST,
            routes: ROUTES,
        };
    };
}

pub mod basketball;
pub mod football;
pub mod formula1;
pub mod handball;
pub mod hockey;
pub mod mma;
pub mod nfl;
pub mod rugby;
pub mod volleyball;

/// Every sport with a client in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Sport {
    Football,
    Basketball,
    Hockey,
    Rugby,
    Handball,
    Volleyball,
    Mma,
    Nfl,
    #[value(name = "formula1", alias = "f1")]
    Formula1,
}

impl Sport {
    pub const ALL: [Sport; 9] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Hockey,
        Sport::Rugby,
        Sport::Handball,
        Sport::Volleyball,
        Sport::Mma,
        Sport::Nfl,
        Sport::Formula1,
    ];

    pub fn descriptor(self) -> SportDescriptor {
        match self {
            Sport::Football => football::SPORT,
            Sport::Basketball => basketball::SPORT,
            Sport::Hockey => hockey::SPORT,
            Sport::Rugby => rugby::SPORT,
            Sport::Handball => handball::SPORT,
            Sport::Volleyball => volleyball::SPORT,
            Sport::Mma => mma::SPORT,
            Sport::Nfl => nfl::SPORT,
            Sport::Formula1 => formula1::SPORT,
        }
    }
}
