//! Flat N-dimensional tables with row-major indexing.
//!
//! The timing image stores deeply nested fixed-size arrays. They are kept
//! here as one contiguous buffer plus the dimension list, so every table
//! shares one bounds check and iteration is a single linear walk.

use serde::{Deserialize, Serialize};

/// A dense row-major table of `N` dimensions.
///
/// `data.len()` is always the product of `dims`; deserialization rejects
/// anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr<T, N>")]
pub struct Table<T, const N: usize> {
    #[serde(with = "dims_serde")]
    dims: [usize; N],
    data: Vec<T>,
}

/// Unchecked wire form of a [`Table`].
#[derive(Deserialize)]
struct TableRepr<T, const N: usize> {
    #[serde(with = "dims_serde")]
    dims: [usize; N],
    data: Vec<T>,
}

impl<T, const N: usize> TryFrom<TableRepr<T, N>> for Table<T, N> {
    type Error = String;

    fn try_from(repr: TableRepr<T, N>) -> Result<Self, Self::Error> {
        let (dims, len) = (repr.dims, repr.data.len());
        Self::from_vec(dims, repr.data)
            .ok_or_else(|| format!("table of dimensions {dims:?} cannot hold {len} elements"))
    }
}

impl<T, const N: usize> Table<T, N> {
    /// Builds a table from its dimensions and row-major data.
    ///
    /// Returns `None` if `data.len()` is not the product of `dims`.
    pub fn from_vec(dims: [usize; N], data: Vec<T>) -> Option<Self> {
        if data.len() != element_count(&dims) {
            return None;
        }
        Some(Self { dims, data })
    }

    /// Builds a table whose length the caller has already checked.
    pub(crate) fn from_checked(dims: [usize; N], data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), element_count(&dims));
        Self { dims, data }
    }

    /// Returns the dimensions.
    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the table has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the linear index of `index`, or `None` if out of bounds.
    pub fn linear_index(&self, index: [usize; N]) -> Option<usize> {
        let mut linear = 0;
        for (i, dim) in index.iter().zip(self.dims.iter()) {
            if i >= dim {
                return None;
            }
            linear = linear * dim + i;
        }
        Some(linear)
    }

    /// Returns the multi-dimensional index of a linear position.
    pub fn unflatten(&self, mut linear: usize) -> [usize; N] {
        let mut index = [0; N];
        for axis in (0..N).rev() {
            index[axis] = linear % self.dims[axis];
            linear /= self.dims[axis];
        }
        index
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.linear_index(index).map(|i| &self.data[i])
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.linear_index(index).map(|i| &mut self.data[i])
    }

    /// Returns the underlying row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over `(index, element)` pairs in storage order.
    pub fn indexed(&self) -> impl Iterator<Item = ([usize; N], &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.unflatten(i), v))
    }
}

impl<T: Clone, const N: usize> Table<T, N> {
    /// Builds a table with every element set to `value`.
    pub fn filled(dims: [usize; N], value: T) -> Self {
        Self {
            dims,
            data: vec![value; element_count(&dims)],
        }
    }
}

/// Returns the number of elements of a table with the given dimensions.
pub fn element_count(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// `serde` cannot derive for `[usize; N]` with a generic `N`, so the
/// dimensions travel as a plain sequence.
mod dims_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        dims: &[usize; N],
        s: S,
    ) -> Result<S::Ok, S::Error> {
        dims.as_slice().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        d: D,
    ) -> Result<[usize; N], D::Error> {
        let v = Vec::<usize>::deserialize(d)?;
        v.try_into()
            .map_err(|v: Vec<usize>| D::Error::invalid_length(v.len(), &"table dimensions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let t = Table::from_vec([2, 3], (0..6).collect::<Vec<i32>>()).unwrap();
        assert_eq!(t.get([0, 0]), Some(&0));
        assert_eq!(t.get([0, 2]), Some(&2));
        assert_eq!(t.get([1, 0]), Some(&3));
        assert_eq!(t.get([1, 2]), Some(&5));
        assert_eq!(t.get([2, 0]), None);
        assert_eq!(t.get([0, 3]), None);
    }

    #[test]
    fn unflatten_inverts_linear_index() {
        let t = Table::filled([4, 8, 4, 12, 5, 8], 0u8);
        for linear in [0, 1, 7, 8, 479, 4000, t.len() - 1] {
            let idx = t.unflatten(linear);
            assert_eq!(t.linear_index(idx), Some(linear));
        }
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Table::<u8, 2>::from_vec([2, 2], vec![0; 3]).is_none());
    }

    #[test]
    fn indexed_walks_in_storage_order() {
        let t = Table::from_vec([2, 2], vec!['a', 'b', 'c', 'd']).unwrap();
        let items: Vec<_> = t.indexed().map(|(i, v)| (i, *v)).collect();
        assert_eq!(
            items,
            vec![([0, 0], 'a'), ([0, 1], 'b'), ([1, 0], 'c'), ([1, 1], 'd')]
        );
    }

    #[test]
    fn get_mut_updates_element() {
        let mut t = Table::filled([3], 0);
        *t.get_mut([1]).unwrap() = 9;
        assert_eq!(t.as_slice(), &[0, 9, 0]);
    }

    #[test]
    fn deserialize_rejects_mismatched_shape() {
        let short: Result<Table<u16, 2>, _> =
            serde_json::from_str(r#"{"dims":[2,2],"data":[1,2,3]}"#);
        let err = short.unwrap_err().to_string();
        assert!(err.contains("cannot hold 3 elements"), "{err}");

        let long: Result<Table<u16, 1>, _> = serde_json::from_str(r#"{"dims":[1],"data":[1,2]}"#);
        assert!(long.is_err());

        let rank: Result<Table<u16, 2>, _> = serde_json::from_str(r#"{"dims":[4],"data":[1,2,3,4]}"#);
        assert!(rank.is_err());

        let empty: Table<u16, 2> = serde_json::from_str(r#"{"dims":[0,5],"data":[]}"#).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.get([0, 0]), None);
    }

    #[test]
    fn table_serde_roundtrip() {
        let t = Table::from_vec([1, 2], vec![5u16, 6]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let restored: Table<u16, 2> = serde_json::from_str(&json).unwrap();
        assert_eq!(t, restored);
    }
}
