//! Reduction kernels
//!
//! A kernel describes one reduction at two granularities: a scalar
//! accumulator (`init`, `fold`, `merge`) and a pack accumulator (`init_pack`,
//! `fold_pack`, `merge_pack`) collapsed by `reduce`. The fold engine decides
//! which elements go through which form; kernels never see indices.

use crate::traits::{Element, SimdVector};

/// Reduction over elements of type `T`
pub trait FoldKernel<T: Element> {
    /// Result of the reduction
    type Value: Copy;

    /// Pack accumulator for packs of type `V`
    type PackAcc<V: SimdVector<Scalar = T>>: Copy;

    /// Whether the pack form may be used
    const SIMD: bool = true;

    /// Reduction name used in errors
    const NAME: &'static str;

    /// Accumulator seeded from one element
    fn init(&self, x: T) -> Self::Value;

    /// Fold one more element into `acc`
    fn fold(&self, acc: &mut Self::Value, x: T);

    /// Combine two partial results
    fn merge(&self, acc: &mut Self::Value, other: Self::Value);

    /// Pack accumulator seeded from one pack
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> Self::PackAcc<V>;

    /// Fold one more pack into `acc`
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut Self::PackAcc<V>, p: V);

    /// Combine two pack accumulators
    fn merge_pack<V: SimdVector<Scalar = T>>(
        &self,
        acc: &mut Self::PackAcc<V>,
        other: Self::PackAcc<V>,
    );

    /// Collapse a pack accumulator across its lanes
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: Self::PackAcc<V>) -> Self::Value;
}

/// Sum of all elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<T: Element> FoldKernel<T> for Sum {
    type Value = T;
    type PackAcc<V: SimdVector<Scalar = T>> = V;

    const NAME: &'static str = "sum";

    #[inline(always)]
    fn init(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fold(&self, acc: &mut T, x: T) {
        *acc = *acc + x;
    }

    #[inline(always)]
    fn merge(&self, acc: &mut T, other: T) {
        *acc = *acc + other;
    }

    #[inline(always)]
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> V {
        p
    }

    #[inline(always)]
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, p: V) {
        *acc = acc.add(p);
    }

    #[inline(always)]
    fn merge_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, other: V) {
        *acc = acc.add(other);
    }

    #[inline(always)]
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: V) -> T {
        acc.horizontal_sum()
    }
}

/// Largest element
#[derive(Debug, Clone, Copy, Default)]
pub struct Maximum;

impl<T: Element> FoldKernel<T> for Maximum {
    type Value = T;
    type PackAcc<V: SimdVector<Scalar = T>> = V;

    const NAME: &'static str = "maximum";

    #[inline(always)]
    fn init(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fold(&self, acc: &mut T, x: T) {
        *acc = acc.max_val(x);
    }

    #[inline(always)]
    fn merge(&self, acc: &mut T, other: T) {
        *acc = acc.max_val(other);
    }

    #[inline(always)]
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> V {
        p
    }

    #[inline(always)]
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, p: V) {
        *acc = acc.max(p);
    }

    #[inline(always)]
    fn merge_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, other: V) {
        *acc = acc.max(other);
    }

    #[inline(always)]
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: V) -> T {
        acc.horizontal_max()
    }
}

/// Smallest element
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimum;

impl<T: Element> FoldKernel<T> for Minimum {
    type Value = T;
    type PackAcc<V: SimdVector<Scalar = T>> = V;

    const NAME: &'static str = "minimum";

    #[inline(always)]
    fn init(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fold(&self, acc: &mut T, x: T) {
        *acc = acc.min_val(x);
    }

    #[inline(always)]
    fn merge(&self, acc: &mut T, other: T) {
        *acc = acc.min_val(other);
    }

    #[inline(always)]
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> V {
        p
    }

    #[inline(always)]
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, p: V) {
        *acc = acc.min(p);
    }

    #[inline(always)]
    fn merge_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, other: V) {
        *acc = acc.min(other);
    }

    #[inline(always)]
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: V) -> T {
        acc.horizontal_min()
    }
}

/// Product of all elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Prod;

impl<T: Element> FoldKernel<T> for Prod {
    type Value = T;
    type PackAcc<V: SimdVector<Scalar = T>> = V;

    const NAME: &'static str = "prod";

    #[inline(always)]
    fn init(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fold(&self, acc: &mut T, x: T) {
        *acc = *acc * x;
    }

    #[inline(always)]
    fn merge(&self, acc: &mut T, other: T) {
        *acc = *acc * other;
    }

    #[inline(always)]
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> V {
        p
    }

    #[inline(always)]
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, p: V) {
        *acc = acc.mul(p);
    }

    #[inline(always)]
    fn merge_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut V, other: V) {
        *acc = acc.mul(other);
    }

    // No backend has a horizontal product; lanes are multiplied in order
    #[inline(always)]
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: V) -> T {
        let mut r = T::ONE;
        acc.scatter(|_, x| r = r * x);
        r
    }
}

/// Smallest and largest element together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxStat<T> {
    /// Smallest element seen
    pub min_value: T,
    /// Largest element seen
    pub max_value: T,
}

impl<T: Element> MinMaxStat<T> {
    /// Statistic of a single element
    pub fn new(x: T) -> Self {
        Self {
            min_value: x,
            max_value: x,
        }
    }

    /// Neutral statistic: `{ +inf, -inf }` for floats
    pub fn empty() -> Self {
        Self {
            min_value: T::UPPER,
            max_value: T::LOWER,
        }
    }

    /// Whether no element has been seen
    pub fn is_empty(&self) -> bool {
        self.min_value > self.max_value
    }

    /// Extend to cover `x`
    pub fn put(&mut self, x: T) {
        self.min_value = self.min_value.min_val(x);
        self.max_value = self.max_value.max_val(x);
    }

    /// Extend to cover `other`
    pub fn merge(&mut self, other: &Self) {
        self.min_value = self.min_value.min_val(other.min_value);
        self.max_value = self.max_value.max_val(other.max_value);
    }

    /// Whether `x` lies within the bounds
    pub fn contains(&self, x: T) -> bool {
        self.min_value <= x && x <= self.max_value
    }
}

impl<T: Element> Default for MinMaxStat<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pack accumulator of [`MinMax`]: a min pack and a max pack advanced in lockstep
#[derive(Debug, Clone, Copy)]
pub struct MinMaxPack<V> {
    /// Lane-wise minimum
    pub min_pack: V,
    /// Lane-wise maximum
    pub max_pack: V,
}

/// Smallest and largest element in one pass
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl<T: Element> FoldKernel<T> for MinMax {
    type Value = MinMaxStat<T>;
    type PackAcc<V: SimdVector<Scalar = T>> = MinMaxPack<V>;

    const NAME: &'static str = "minmax";

    #[inline(always)]
    fn init(&self, x: T) -> MinMaxStat<T> {
        MinMaxStat::new(x)
    }

    #[inline(always)]
    fn fold(&self, acc: &mut MinMaxStat<T>, x: T) {
        acc.put(x);
    }

    #[inline(always)]
    fn merge(&self, acc: &mut MinMaxStat<T>, other: MinMaxStat<T>) {
        acc.merge(&other);
    }

    #[inline(always)]
    fn init_pack<V: SimdVector<Scalar = T>>(&self, p: V) -> MinMaxPack<V> {
        MinMaxPack {
            min_pack: p,
            max_pack: p,
        }
    }

    #[inline(always)]
    fn fold_pack<V: SimdVector<Scalar = T>>(&self, acc: &mut MinMaxPack<V>, p: V) {
        acc.min_pack = acc.min_pack.min(p);
        acc.max_pack = acc.max_pack.max(p);
    }

    #[inline(always)]
    fn merge_pack<V: SimdVector<Scalar = T>>(
        &self,
        acc: &mut MinMaxPack<V>,
        other: MinMaxPack<V>,
    ) {
        acc.min_pack = acc.min_pack.min(other.min_pack);
        acc.max_pack = acc.max_pack.max(other.max_pack);
    }

    #[inline(always)]
    fn reduce<V: SimdVector<Scalar = T>>(&self, acc: MinMaxPack<V>) -> MinMaxStat<T> {
        MinMaxStat {
            min_value: acc.min_pack.horizontal_min(),
            max_value: acc.max_pack.horizontal_max(),
        }
    }
}
