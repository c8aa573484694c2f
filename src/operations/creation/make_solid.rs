use crate::error::Result;
use crate::topology::{ShellId, SolidData, SolidId, TopologyStore};

/// Creates a solid bounded by a shell.
///
/// An open shell yields a sheet body.
pub struct MakeSolid {
    outer_shell: ShellId,
}

impl MakeSolid {
    /// Creates a new `MakeSolid` operation.
    #[must_use]
    pub fn new(outer_shell: ShellId) -> Self {
        Self { outer_shell }
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell does not exist.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        store.shell(self.outer_shell)?;
        Ok(store.add_solid(SolidData {
            outer_shell: self.outer_shell,
        }))
    }
}
