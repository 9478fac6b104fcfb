use super::error::ModelError;

/// Identifier state embedded in every entity that occupies chain ids.
///
/// An entity represents `num` identical copies (e.g. a homo-hexamer has
/// `num == 6`) and owns exactly one identifier per copy once the owning
/// document has reconciled it. The `registered` flag records whether the
/// current identifiers have already been fed into the document register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdHolder {
    ids: Option<Vec<String>>,
    num: usize,
    registered: bool,
}

impl Default for IdHolder {
    fn default() -> Self {
        Self {
            ids: None,
            num: 1,
            registered: false,
        }
    }
}

impl IdHolder {
    /// Creates the identifier state for a new entity.
    ///
    /// # Arguments
    ///
    /// * `ids` - Explicit identifiers; an empty list counts as none.
    /// * `num` - Declared copy count. Defaults to the number of explicit
    ///   identifiers, or to `1`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IdCountMismatch`] if both are given and disagree,
    /// and [`ModelError::ZeroCopies`] for a copy count of zero.
    pub fn new(ids: Option<Vec<String>>, num: Option<usize>) -> Result<Self, ModelError> {
        let ids = ids.filter(|ids| !ids.is_empty());
        let num = match (&ids, num) {
            (_, Some(0)) => return Err(ModelError::ZeroCopies),
            (Some(ids), Some(num)) if ids.len() != num => {
                return Err(ModelError::IdCountMismatch {
                    expected: num,
                    found: ids.len(),
                });
            }
            (_, Some(num)) => num,
            (Some(ids), None) => ids.len(),
            (None, None) => 1,
        };
        Ok(Self {
            ids,
            num,
            registered: false,
        })
    }

    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    pub fn num(&self) -> usize {
        self.num
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Replaces the identifiers. The count must match the copy count.
    pub fn set_ids(&mut self, ids: Vec<String>) -> Result<(), ModelError> {
        if ids.len() != self.num {
            return Err(ModelError::IdCountMismatch {
                expected: self.num,
                found: ids.len(),
            });
        }
        self.ids = Some(ids);
        self.registered = false;
        Ok(())
    }

    pub fn clear_ids(&mut self) {
        self.ids = None;
        self.registered = false;
    }

    pub(crate) fn mark_registered(&mut self) {
        self.registered = true;
    }

    /// Stores identifiers freshly taken from a register, already counted as registered.
    pub(crate) fn assign_generated(&mut self, ids: Vec<String>) {
        debug_assert_eq!(ids.len(), self.num);
        self.ids = Some(ids);
        self.registered = true;
    }
}

/// Capability shared by sequences and ligands: owning chain identifiers.
pub trait Identifiable {
    fn id_holder(&self) -> &IdHolder;

    fn id_holder_mut(&mut self) -> &mut IdHolder;

    fn ids(&self) -> Option<&[String]> {
        self.id_holder().ids()
    }

    fn num(&self) -> usize {
        self.id_holder().num()
    }

    fn is_registered(&self) -> bool {
        self.id_holder().is_registered()
    }

    fn set_ids(&mut self, ids: Vec<String>) -> Result<(), ModelError> {
        self.id_holder_mut().set_ids(ids)
    }

    fn clear_ids(&mut self) {
        self.id_holder_mut().clear_ids();
    }
}
