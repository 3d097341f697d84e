//! # Quadmap
//!
//! Two hash maps sharing one contract, differing in how they resolve collisions.
//!
//! - `OpenAddressingMap`: every entry lives directly in the bucket array. Collisions are
//!   resolved with quadratic probing, removals leave tombstones, and the table doubles
//!   before any insertion once half of it is in use.
//! - `ChainedHashMap`: every bucket owns a chain of entries. Collisions extend the chain
//!   and removals unlink entries.
//!
//! Both take their hash function as a value at construction time. Anything implementing
//! [`HashFunction`] works, including plain closures of the shape `Fn(&K) -> u64`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use quadmap::{CodePointSum, OpenAddressingMap};
//!
//! // Create a map with 20 buckets
//! let mut map = OpenAddressingMap::with_hasher(20, CodePointSum);
//!
//! // Insert values
//! map.put("key1".to_string(), 10)?;
//! assert_eq!((map.size(), map.capacity()), (1, 20));
//!
//! // Rehash into a bigger table
//! map.resize_table(30)?;
//! assert_eq!(map.capacity(), 30);
//! assert_eq!(map.get("key1"), Some(&10));
//!
//! // Remove values
//! map.remove("key1");
//! assert!(!map.contains_key("key1"));
//! # Ok::<(), quadmap::MapError>(())
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use quadmap::{ChainedHashMap, find_mode};
//!
//! let mut map = ChainedHashMap::with_capacity(10);
//! map.put("key1".to_string(), 10);
//! map.put("key2".to_string(), 20);
//! map.put("key3".to_string(), 30);
//! map.remove("key3");
//! assert!(map.contains_key("key1"));
//! assert!(!map.contains_key("key3"));
//!
//! // The mode finder tallies in a chained map
//! let fruit = ["apple", "apple", "grape", "melon", "melon", "peach"];
//! assert_eq!(find_mode(&fruit), (vec!["apple", "melon"], 2));
//! ```

/// Module implementing the separate chaining hash map
mod chained;
/// Error types
mod error;
/// Hash function capability and the provided strategies
mod hash_function;
/// Mode finding on top of the chained map
mod mode;
/// Module implementing the open addressing hash map with quadratic probing
mod open_addressing;
/// Utility traits for the hash maps
mod utils;

pub use chained::ChainedHashMap;
pub use error::{MapError, Result};
pub use hash_function::{CodePointSum, DefaultHashFunction, HashFunction, WeightedCodePointSum};
pub use mode::{find_mode, find_mode_with};
pub use open_addressing::OpenAddressingMap;
pub use utils::BucketTable;
