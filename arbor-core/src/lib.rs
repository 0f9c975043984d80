//! Runtime for a single-threaded reactive value-propagation graph.
//!
//! This crate is the low-level engine: a level-scheduled graph of vars, computed nodes, flatten
//! nodes and observers, all running on one thread behind `Rc`/`RefCell`. It has no opinion on
//! ergonomics — that's [`arbor`](https://docs.rs/arbor), the façade crate built on top of this
//! one, the same way `isoprenoid` sits underneath `flourish` in the crate this one started from.
//!
//! Contract violations (double-detach, cross-context composition, ticking a node whose operation
//! was stolen) are bugs in the caller and panic rather than returning a `Result`: there is no
//! recoverable state to hand back.

mod computed;
mod context;
mod flatten;
mod graph;
mod node;
mod observable;
mod observer;
mod operation;
mod queue;
mod signal;
mod var;

pub use computed::ComputedNode;
pub use context::Context;
pub use flatten::FlattenNode;
pub use node::{AnyNode, NodeId};
pub use observer::{ObserverAction, ObserverNode};
pub use operation::{ConstOp, LeafOp, Op1, Op2, Op3, Operation};
pub use signal::{SignalHandle, SignalLike};
pub use var::VarNode;
