/// The action consumed by one tick.
///
/// Automated controllers choose among [`Action::CONTROLLER_ACTIONS`] by index;
/// [`Action::SoftDrop`] is only produced by human input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Action {
    /// Do nothing; gravity still applies.
    #[default]
    Idle,
    MoveLeft,
    MoveRight,
    /// Rotate 90° clockwise in place.
    Rotate,
    /// Hard drop: fall until one row above the first collision. The gravity
    /// step of the same tick then locks the piece.
    Drop,
    /// Move down by one row.
    SoftDrop,
}

impl Action {
    /// Action vocabulary of automated controllers, in output-index order.
    pub const CONTROLLER_ACTIONS: [Self; 4] =
        [Self::MoveLeft, Self::MoveRight, Self::Rotate, Self::Drop];

    /// Maps a controller output index to an action.
    ///
    /// Unrecognized indices map to [`Action::Idle`].
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_engine::Action;
    ///
    /// assert_eq!(Action::from_index(2), Action::Rotate);
    /// assert_eq!(Action::from_index(17), Action::Idle);
    /// ```
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::CONTROLLER_ACTIONS
            .get(index)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the controller output index of this action, if it has one.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        Self::CONTROLLER_ACTIONS.iter().position(|a| *a == self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_indices() {
        for (i, action) in Action::CONTROLLER_ACTIONS.into_iter().enumerate() {
            assert_eq!(Action::from_index(i), action);
            assert_eq!(action.index(), Some(i));
        }
        assert_eq!(Action::Idle.index(), None);
        assert_eq!(Action::SoftDrop.index(), None);
        assert!(Action::from_index(4).is_idle());
        assert!(Action::from_index(usize::MAX).is_idle());
    }
}
