use crate::f;

/// Extends slices of array extents with shape-related helpers
pub trait ShapeExt {
    /// Total number of elements described by the shape
    ///
    /// Returns `None` if the product overflows a `usize`. An empty shape is a
    /// scalar and holds exactly one element.
    ///
    /// ```rust
    /// # use voxtools_utils::ShapeExt;
    /// assert_eq!([4usize, 4, 4].element_count(), Some(64));
    /// assert_eq!([2usize, 0, 3].element_count(), Some(0));
    /// assert_eq!(Vec::<usize>::new().element_count(), Some(1));
    /// assert_eq!([usize::MAX, 2].element_count(), None);
    /// ```
    fn element_count(&self) -> Option<usize>;

    /// Shape formatted for messages, e.g. `951x1001x1001`
    ///
    /// ```rust
    /// # use voxtools_utils::ShapeExt;
    /// assert_eq!([951usize, 1001, 1001].dims(), "951x1001x1001");
    /// assert_eq!(Vec::<usize>::new().dims(), "scalar");
    /// ```
    fn dims(&self) -> String;

    /// True if every extent is at least one
    ///
    /// ```rust
    /// # use voxtools_utils::ShapeExt;
    /// assert!([2usize, 2, 2].is_populated());
    /// assert!(![2usize, 0, 2].is_populated());
    /// ```
    fn is_populated(&self) -> bool;
}

impl<T: AsRef<[usize]> + ?Sized> ShapeExt for T {
    fn element_count(&self) -> Option<usize> {
        self.as_ref()
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    fn dims(&self) -> String {
        let shape = self.as_ref();
        if shape.is_empty() {
            return "scalar".to_string();
        }

        shape
            .iter()
            .map(|n| f!("{n}"))
            .collect::<Vec<String>>()
            .join("x")
    }

    fn is_populated(&self) -> bool {
        self.as_ref().iter().all(|&n| n > 0)
    }
}
