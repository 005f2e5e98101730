//! Named groups of designs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DesignSpaceError, Result};

/// Identity of a cluster. Ids are never reused within a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster#{}", self.0)
    }
}

/// A named, optionally hidden group of designs.
///
/// Two clusters are the same cluster when their ids are equal, whatever
/// their names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    id: ClusterId,
    name: String,
    active: bool,
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cluster {}

impl Cluster {
    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inactive clusters are hidden by renderers.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// The ordered clusters of one data sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
    next_id: u32,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cluster named `Cluster N`, N being the lowest number not used by
    /// another cluster's name.
    pub fn new_cluster(&mut self) -> ClusterId {
        let name = (1..)
            .map(|n| format!("Cluster {}", n))
            .find(|candidate| !self.clusters.iter().any(|c| &c.name == candidate))
            .unwrap_or_default();

        let id = ClusterId(self.next_id);
        self.next_id += 1;
        self.clusters.push(Cluster {
            id,
            name,
            active: true,
        });
        id
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn by_name(&self, name: &str) -> Result<&Cluster> {
        self.clusters
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DesignSpaceError::ClusterNotFound(name.to_string()))
    }

    fn get_mut(&mut self, id: ClusterId) -> Result<&mut Cluster> {
        self.clusters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DesignSpaceError::ClusterNotFound(id.to_string()))
    }

    /// Remove a cluster. Designs referring to it must be cleared by the
    /// caller; [`DataSheet::remove_cluster`](crate::sheet::DataSheet::remove_cluster)
    /// does both.
    pub fn remove(&mut self, id: ClusterId) -> Result<Cluster> {
        let index = self
            .clusters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DesignSpaceError::ClusterNotFound(id.to_string()))?;
        Ok(self.clusters.remove(index))
    }

    /// Rename a cluster. The name must be non-empty and not used by another
    /// cluster of the set.
    pub fn rename(&mut self, id: ClusterId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DesignSpaceError::Config(
                "cluster name must not be empty".to_string(),
            ));
        }
        if self.clusters.iter().any(|c| c.id != id && c.name == name) {
            return Err(DesignSpaceError::DuplicateName(name.to_string()));
        }
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_active(&mut self, id: ClusterId, active: bool) -> Result<()> {
        self.get_mut(id)?.active = active;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
