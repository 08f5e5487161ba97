// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The clustering primitives shared by the substation and transmission line
//! graphs.

mod arena;
mod cluster;
mod list;
mod row;

pub(crate) use arena::ClusterArena;
pub use arena::ClusterHandle;
pub use cluster::VertexCluster;
pub use list::VertexAdjacencyList;
pub use row::VertexAdjacencyRow;
