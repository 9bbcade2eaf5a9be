#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use narray::{InvariantError, NArray, ReadOnly};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    thread_local! {
        static DEFAULTS: Cell<usize> = const { Cell::new(0) };
        static CLONES: Cell<usize> = const { Cell::new(0) };
    }

    fn reset_counters() {
        DEFAULTS.with(|c| c.set(0));
        CLONES.with(|c| c.set(0));
    }

    fn defaults() -> usize {
        DEFAULTS.with(Cell::get)
    }

    fn clones() -> usize {
        CLONES.with(Cell::get)
    }

    /// Counts default constructions and clones.
    #[derive(Debug, PartialEq)]
    struct Tracked(i32);

    impl Default for Tracked {
        fn default() -> Self {
            DEFAULTS.with(|c| c.set(c.get() + 1));
            Tracked(0)
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            CLONES.with(|c| c.set(c.get() + 1));
            Tracked(self.0)
        }
    }

    /// Has no `Default`, so only value and sequence construction apply.
    #[derive(Debug, Clone, PartialEq)]
    struct NoDefault(u8);

    #[test]
    fn value_fill_clones_once_per_element() {
        init();
        reset_counters();
        let a = NArray::<Tracked, 3>::full([2, 3, 4], Tracked(7));
        assert_eq!(clones(), a.size());
        assert_eq!(defaults(), 0);
        assert_eq!(a.get([1, 2, 3]).unwrap(), Tracked(7));
    }

    #[test]
    fn default_array_is_empty() {
        init();
        reset_counters();
        let a = NArray::<NoDefault, 2>::default();
        assert_eq!(a.size(), 0);
        assert!(a.is_empty());
        assert_eq!(a.dims(), [0, 0]);
        assert_eq!(a.iter().count(), 0);
        let b = NArray::<Tracked, 2>::default();
        assert_eq!(b.size(), 0);
        assert_eq!(defaults(), 0);
    }

    #[test]
    fn non_default_elements_from_value_or_sequence() {
        init();
        let a = NArray::<NoDefault, 1>::full([3], NoDefault(1));
        assert_eq!(a.get([2]).unwrap(), NoDefault(1));
        let b = NArray::<NoDefault, 1>::try_from_elems([2], [NoDefault(4), NoDefault(5)]).unwrap();
        assert_eq!(b.get([1]).unwrap(), NoDefault(5));
        assert_eq!(
            NArray::<NoDefault, 1>::try_from_elems([3], [NoDefault(4)]).unwrap_err(),
            InvariantError::ElementCount {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn sequence_fill_pads_and_truncates() {
        init();
        let short = NArray::<i32, 2>::from_elems([2, 2], [1, 2, 3]);
        assert_eq!(short.iter().collect::<Vec<_>>(), vec![1, 2, 3, 0]);
        let long = NArray::<i32, 2>::from_elems([2, 2], [1, 2, 3, 4, 5]);
        assert_eq!(long.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        reset_counters();
        let _ = NArray::<Tracked, 2>::from_elems([2, 2], (0..4).map(Tracked));
        assert_eq!(defaults(), 0);
        let _ = NArray::<Tracked, 2>::from_elems([2, 2], (0..3).map(Tracked));
        assert_eq!(defaults(), 1);
    }

    #[test]
    fn clone_shares_storage() {
        init();
        let a = NArray::<i32, 2>::new([2, 3]);
        let b = a.clone();
        assert_eq!(a.use_count(), 2);
        assert!(!a.is_unique());
        b.set([1, 1], 42).unwrap();
        assert_eq!(a.get([1, 1]).unwrap(), 42);
        for coord in a.coords() {
            let coord = [coord[0], coord[1]];
            assert_eq!(a.element_ptr(coord).unwrap(), b.element_ptr(coord).unwrap());
        }
        drop(b);
        assert!(a.is_unique());
    }

    #[test]
    fn deep_clone_is_independent() {
        init();
        let a = NArray::<Tracked, 2>::from_elems([3, 4], (0..12).map(Tracked));
        let flipped = a.flip(1).unwrap().transpose().unwrap();
        reset_counters();
        let copy = flipped.deep_clone();
        assert_eq!(clones(), copy.size());
        assert_eq!(defaults(), 0);
        assert!(copy.is_contiguous());
        assert!(copy.is_unique());
        assert_eq!(copy, flipped);
        a.set([0, 3], Tracked(-1)).unwrap();
        assert_eq!(flipped.get([0, 0]).unwrap(), Tracked(-1));
        assert_eq!(copy.get([0, 0]).unwrap(), Tracked(3));
    }

    #[test]
    fn read_only_views_share_and_deep_clone_back() {
        init();
        let a = NArray::<i32, 1>::from_elems([4], 0..4);
        let ro: NArray<i32, 1, ReadOnly> = a.clone().into_read_only();
        let tail = ro.range(0, 2, 2).unwrap();
        assert_eq!(tail.iter().collect::<Vec<_>>(), vec![2, 3]);
        let writable = tail.deep_clone();
        writable.set([0], 9).unwrap();
        assert_eq!(a.get([2]).unwrap(), 2);
    }

    #[test]
    fn repeat_aliases_one_address() {
        init();
        let a = NArray::<f32, 2>::randn([2, 3]);
        let r = a.repeat::<3>(5).unwrap();
        assert_eq!(r.dims(), [2, 3, 5]);
        for k in 1..5 {
            assert_eq!(
                r.element_ptr([1, 2, k]).unwrap(),
                r.element_ptr([1, 2, 0]).unwrap()
            );
        }
        assert_eq!(r.element_ptr([1, 2, 4]).unwrap(), a.element_ptr([1, 2]).unwrap());
    }

    #[test]
    fn window_then_skip_matches_reshape_then_permute() {
        init();
        let a = NArray::<usize, 2>::from_fn([4, 6], |[i, j]| i * 6 + j);
        let patches = a.window::<3>(0, 2).unwrap().skip(0, 2, 0).unwrap();
        let blocks = a.reshape::<3>([2, 2, 6]).unwrap().permute([0, 2, 1]).unwrap();
        assert_eq!(patches.dims(), [2, 6, 2]);
        assert_eq!(patches.strides(), blocks.strides());
        assert_eq!(patches.offset(), blocks.offset());
        assert_eq!(patches, blocks);
    }

    #[test]
    fn overlapping_windows() {
        init();
        let a = NArray::<i32, 1>::from_elems([5], 0..5);
        let w = a.window::<2>(0, 3).unwrap();
        assert_eq!(w.dims(), [3, 3]);
        let rows = w
            .subarrays::<1>()
            .unwrap()
            .map(|row| row.iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![0, 1, 2], vec![1, 2, 3], vec![2, 3, 4]]);
    }

    #[test]
    fn double_flip_restores_view() {
        init();
        let a = NArray::<i32, 3>::from_elems([2, 3, 4], 0..24);
        for axis in 0..3 {
            let twice = a.flip(axis).unwrap().flip(axis).unwrap();
            assert_eq!(twice.view(), a.view());
        }
    }

    #[test]
    fn reshape_of_fully_flipped_view_keeps_order() {
        init();
        let a = NArray::<i32, 2>::from_elems([2, 3], 0..6);
        let flipped = a.flip(0).unwrap().flip(1).unwrap();
        let line = flipped.reshape::<1>([6]).unwrap();
        assert_eq!(line.strides().to_vec(), vec![-1]);
        assert_eq!(line.iter().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1, 0]);
        let err = a.reshape::<2>([4, 2]).unwrap_err();
        assert_eq!(
            err.invariant(),
            Some(&InvariantError::ElementCount {
                expected: 6,
                actual: 8
            })
        );
    }

    #[test]
    fn condense_is_idempotent_and_keeps_content() {
        init();
        let a = NArray::<i32, 3>::from_elems([2, 3, 4], 0..24);
        let messy = a.flip(2).unwrap().permute([1, 2, 0]).unwrap();
        let once = messy.as_condensed().unwrap();
        let twice = once.as_condensed().unwrap();
        assert_eq!(once.view(), twice.view());
        assert_eq!(once.dims(), [1, 1, 24]);
        let mut content = messy.iter().collect::<Vec<_>>();
        content.sort();
        assert_eq!(once.iter().collect::<Vec<_>>(), content);
    }

    #[test]
    fn subarrays_count_and_order() {
        init();
        let a = NArray::<i32, 3>::from_elems([2, 3, 4], 0..24);
        let rows = a.subarrays::<1>().unwrap();
        assert_eq!(rows.len(), 6);
        let firsts = rows
            .clone()
            .map(|row| row.get([0]).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(firsts, vec![0, 4, 8, 12, 16, 20]);
        // restartable
        assert_eq!(rows.count(), 6);

        let scalars = a.subarrays::<0>().unwrap();
        assert_eq!(scalars.len(), 24);
        for (item, coord) in scalars.zip(a.coords()) {
            assert_eq!(item.get([]).unwrap(), a.get([coord[0], coord[1], coord[2]]).unwrap());
        }
        assert!(a.subarrays::<4>().is_err());
    }

    #[test]
    fn mixed_type_addition_promotes() -> anyhow::Result<()> {
        init();
        let a = NArray::<i32, 2>::from_elems([2, 2], [1, 2, 3, 4]);
        let b = NArray::<f64, 2>::from_elems([2, 2], [0.5, 0.25, -1.0, 10.0]);
        let c: NArray<f64, 2> = (&a + &b)?;
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![1.5, 2.25, 2.0, 14.0]);
        let d: NArray<f64, 2> = b.add(&a)?;
        assert_eq!(c, d);
        Ok(())
    }

    #[test]
    fn scalar_broadcast_in_both_positions() {
        init();
        let a = NArray::<f32, 1>::from_elems([3], [1.0, 2.0, 4.0]);
        let halves: NArray<f64, 1> = &a / 2.0f64;
        assert_eq!(halves.iter().collect::<Vec<_>>(), vec![0.5, 1.0, 2.0]);
        let inverted: NArray<f32, 1> = 1.0f32 / &a;
        assert_eq!(inverted.iter().collect::<Vec<_>>(), vec![1.0, 0.5, 0.25]);
    }

    #[test]
    fn compress_reduces_trailing_axes() {
        init();
        let a = NArray::<i32, 3>::full([2, 3, 4], 5);
        let first = a
            .compress::<i32, 1, 2, _>(|sub| sub.get([0, 0]).unwrap() + 1)
            .unwrap();
        assert_eq!(first.dims(), [2]);
        assert!(first.iter().all(|x| x == 6));
        let second = a
            .compress::<i32, 2, 1, _>(|sub| sub.get([0]).unwrap() + 1)
            .unwrap();
        assert_eq!(second.dims(), [2, 3]);
        assert!(second.iter().all(|x| x == 6));
        assert!(!second.shares_storage(&a.at::<2>(0).unwrap()));
    }

    #[test]
    fn out_of_range_access_fails() {
        init();
        let a = NArray::<u8, 2>::new([2, 2]);
        assert!(matches!(
            a.get([0, 2]),
            Err(InvariantError::OutOfBounds { axis: 1, .. })
        ));
        assert!(a.subarray([1, 1], [2, 1]).is_err());
        assert!(a.skip(0, 0, 0).is_err());
        assert!(a.window::<3>(1, 3).is_err());
        assert!(a.permute([1, 1]).is_err());
    }

    #[test]
    fn condensing_a_repeat_drops_the_aliases() {
        init();
        let a = NArray::<i32, 1>::from_elems([3], [1, 2, 3]);
        let r = a.repeat::<2>(5).unwrap();
        assert_eq!(r.dims(), [3, 5]);
        assert_eq!(r.size(), 15);
        let condensed = r.as_condensed().unwrap();
        assert_eq!(condensed.dims(), [1, 3]);
        assert_eq!(condensed.size(), 3);
        assert_eq!(condensed.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn overflowing_shape_panics_on_construction() {
        let _ = NArray::<u64, 2>::new([1 << 63, 2]);
    }

    #[test]
    fn overflowing_shapes_are_rejected() {
        init();
        assert!(matches!(
            NArray::<u8, 2>::try_from_elems([usize::MAX, 3], std::iter::empty()),
            Err(InvariantError::SizeOverflow(_))
        ));
        let a = NArray::<u8, 2>::new([2, 3]);
        let err = a.repeat::<3>(usize::MAX).unwrap_err();
        assert!(matches!(err.invariant(), Some(InvariantError::SizeOverflow(_))));
        let err = a.reshape::<2>([usize::MAX, 2]).unwrap_err();
        assert!(matches!(err.invariant(), Some(InvariantError::SizeOverflow(_))));
    }

    #[test]
    fn oversized_extents_are_out_of_bounds() {
        init();
        let a = NArray::<u8, 1>::new([4]);
        assert!(matches!(
            a.subarray([1], [usize::MAX]).unwrap_err().invariant(),
            Some(InvariantError::OutOfBounds { axis: 0, .. })
        ));
        assert!(matches!(
            a.range(0, 2, usize::MAX).unwrap_err().invariant(),
            Some(InvariantError::OutOfBounds { axis: 0, index: 2, dim: 4 })
        ));
        assert_eq!(a.range(0, 2, 2).unwrap().size(), 2);
    }
}
