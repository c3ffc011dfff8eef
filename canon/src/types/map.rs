use alloc::collections::BTreeMap;
use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, MapAccess, Visitor};
use crate::ser::{Serialize, SerializeMap, Serializer};
use crate::shape::Shapes;

/// Collects the entries of a map or struct into the map `M`.
///
/// The map's own nodes come from the global heap, the keys and values are
/// decoded with the allocator. When a key appears twice, the later entry
/// wins and the earlier one is released.
struct MapVisitor<'a, M, A> {
    allocator: &'a A,
    _map: PhantomData<fn() -> M>,
}

macro_rules! impl_map {
    ($map:ident <K: $($key_bound:path),+>) => {
        impl<K: Serialize, V: Serialize> Serialize for $map<K, V> {
            fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for (key, value) in self {
                    map.serialize_entry(key, value)?;
                }
                map.finish()
            }
        }

        impl<K: Deserialize $(+ $key_bound)+, V: Deserialize> Deserialize for $map<K, V> {
            fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
                deserializer.deserialize(MapVisitor::<Self, A> { allocator, _map: PhantomData })
            }

            fn release<A: Allocator>(self, allocator: &A) {
                for (key, value) in self {
                    key.release(allocator);
                    value.release(allocator);
                }
            }
        }

        impl<A: Allocator, K: Deserialize $(+ $key_bound)+, V: Deserialize> Visitor for MapVisitor<'_, $map<K, V>, A> {
            type Value = $map<K, V>;

            fn expecting(&self) -> Shapes {
                Shapes::MAP | Shapes::STRUCT
            }

            fn visit_map<M: MapAccess>(self, access: &mut M) -> Result<Self::Value, M::Error> {
                let mut map = $map::<K, V>::new();
                loop {
                    match access.next_entry::<K, V, A>(self.allocator) {
                        Ok(Some((key, value))) => {
                            if let Some((old_key, old_value)) = map.remove_entry(&key) {
                                old_key.release(self.allocator);
                                old_value.release(self.allocator);
                            }
                            map.insert(key, value);
                        }
                        Ok(None) => return Ok(map),
                        Err(error) => {
                            log::debug!("releasing {} decoded map entries", map.len());
                            Deserialize::release(map, self.allocator);
                            return Err(error);
                        }
                    }
                }
            }
        }
    };
}

impl_map!(BTreeMap<K: Ord>);

#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
impl_map!(HashMap<K: Eq, core::hash::Hash>);
