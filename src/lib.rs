//! Indexed priority queue.
//!
//! A [`PriorityMap`] keeps unique keys in a binary heap ordered by their values and maintains
//! an index from every key to its heap position. Besides the usual `top`/`pop` this allows
//! looking up, changing the value of, or removing any key:
//!
//! | operation                              | cost       |
//! |----------------------------------------|------------|
//! | `top`, `peek`, `find`, `get`, `len`    | `O(1)`     |
//! | `insert`, `update`, `replace`, `erase` | `O(log n)` |
//! | `pop`                                  | `O(log n)` |
//! | `from_pairs`, `collect`                | `O(n)`     |
//!
//! ```
//! use priority_map::{Greater, PriorityMap};
//!
//! // Shortest distances first
//! let mut frontier = PriorityMap::with_comparator(Greater);
//! frontier.update("a", 7);
//! frontier.update("b", 3);
//! frontier.update("a", 1);
//!
//! assert_eq!(frontier.pop(), Some(("a", 1)));
//! assert_eq!(frontier.pop(), Some(("b", 3)));
//! assert!(frontier.top().is_err());
//! ```

pub mod compare;
pub mod error;
pub mod iter;
pub mod priority_map;
mod serde_impl;

pub use crate::compare::{Compare, FnCompare, Greater, Less};
pub use crate::error::PriorityMapError;
pub use crate::iter::{IntoIter, Iter};
pub use crate::priority_map::{Entry, PriorityMap};
