//! A binary heap ordered by an injected comparator.
//!
//! The comparator answers "does `a` have strictly higher priority than `b`", so a min-heap over
//! distances is built with `|a, b| a < b`:
//!
//! ```rust
//! use bevy_flocking_goals_plugin::prelude::*;
//! let mut queue = PriorityQueue::new(|a: &u32, b: &u32| a < b);
//! queue.push_all([5, 1, 3]);
//! assert_eq!(Some(1), queue.pop());
//! assert_eq!(Some(&3), queue.peek());
//! ```
//!
//! Duplicates are permitted, which lets a shortest path search push a cell again whenever its
//! distance improves and skip stale entries as they are popped (lazy deletion).
//!

use std::fmt;

/// Heap of `T` where the top is always an element no other element has strictly higher
/// priority than
pub struct PriorityQueue<T, F>
where
	F: Fn(&T, &T) -> bool,
{
	/// Heap ordered array, index 0 is the top
	heap: Vec<T>,
	/// Returns true when the first argument has strictly higher priority than the second
	comparator: F,
}

impl<T: fmt::Debug, F: Fn(&T, &T) -> bool> fmt::Debug for PriorityQueue<T, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PriorityQueue")
			.field("heap", &self.heap)
			.finish_non_exhaustive()
	}
}

impl<T, F: Fn(&T, &T) -> bool> PriorityQueue<T, F> {
	/// Create an empty queue ordered by `comparator`
	pub fn new(comparator: F) -> Self {
		PriorityQueue {
			heap: Vec::new(),
			comparator,
		}
	}
	/// Create an empty queue with room for `capacity` elements before reallocating
	pub fn with_capacity(capacity: usize, comparator: F) -> Self {
		PriorityQueue {
			heap: Vec::with_capacity(capacity),
			comparator,
		}
	}
	/// Number of elements in the queue
	pub fn len(&self) -> usize {
		self.heap.len()
	}
	/// True when the queue holds no elements
	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}
	/// Highest priority element without removing it
	pub fn peek(&self) -> Option<&T> {
		self.heap.first()
	}
	/// Insert an element and return the new size
	pub fn push(&mut self, value: T) -> usize {
		self.heap.push(value);
		self.sift_up(self.heap.len() - 1);
		self.heap.len()
	}
	/// Insert every element of `values` and return the new size
	pub fn push_all<I: IntoIterator<Item = T>>(&mut self, values: I) -> usize {
		for value in values {
			self.push(value);
		}
		self.heap.len()
	}
	/// Remove and return the highest priority element
	pub fn pop(&mut self) -> Option<T> {
		if self.heap.is_empty() {
			return None;
		}
		let last = self.heap.len() - 1;
		self.heap.swap(0, last);
		let top = self.heap.pop();
		if !self.heap.is_empty() {
			self.sift_down(0);
		}
		top
	}
	/// Swap the highest priority element for `value` in a single sift, returning the old top. On an
	/// empty queue `value` is simply pushed and `None` returned
	pub fn replace(&mut self, value: T) -> Option<T> {
		if self.heap.is_empty() {
			self.push(value);
			return None;
		}
		let top = std::mem::replace(&mut self.heap[0], value);
		self.sift_down(0);
		Some(top)
	}
	/// Remove every element
	pub fn clear(&mut self) {
		self.heap.clear();
	}
	/// True if the element at `i` has strictly higher priority than the element at `j`
	fn greater(&self, i: usize, j: usize) -> bool {
		(self.comparator)(&self.heap[i], &self.heap[j])
	}
	/// Move the element at `index` towards the top until its parent outranks or ties it
	fn sift_up(&mut self, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if self.greater(index, parent) {
				self.heap.swap(index, parent);
				index = parent;
			} else {
				break;
			}
		}
	}
	/// Move the element at `index` towards the leaves until neither child outranks it
	fn sift_down(&mut self, mut index: usize) {
		let len = self.heap.len();
		loop {
			let left = 2 * index + 1;
			let right = left + 1;
			let mut best = index;
			if left < len && self.greater(left, best) {
				best = left;
			}
			if right < len && self.greater(right, best) {
				best = right;
			}
			if best == index {
				break;
			}
			self.heap.swap(index, best);
			index = best;
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, Rng, SeedableRng};
	#[test]
	fn pop_in_priority_order() {
		let mut queue = PriorityQueue::new(|a: &i32, b: &i32| a > b);
		queue.push_all([4, 9, 1, 7, 3, 9, 0]);
		let mut result = Vec::new();
		while let Some(v) = queue.pop() {
			result.push(v);
		}
		let actual = vec![9, 9, 7, 4, 3, 1, 0];
		assert_eq!(actual, result);
	}
	#[test]
	fn min_heap_of_distances() {
		let mut queue = PriorityQueue::new(|a: &(f32, usize), b: &(f32, usize)| a.0 < b.0);
		queue.push((3.0, 0));
		queue.push((1.0, 1));
		queue.push((2.0, 2));
		let result = queue.pop().map(|(_, id)| id);
		let actual = Some(1);
		assert_eq!(actual, result);
	}
	#[test]
	fn interleaved_pops_match_sorted_mirror() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut queue = PriorityQueue::new(|a: &u32, b: &u32| a > b);
		// ascending, so the highest priority sits at the end
		let mut mirror: Vec<u32> = Vec::new();
		for _ in 0..500 {
			if rng.random_bool(0.6) {
				let value = rng.random_range(0..100);
				queue.push(value);
				let at = mirror.partition_point(|v| *v <= value);
				mirror.insert(at, value);
			} else {
				let result = queue.pop();
				let actual = mirror.pop();
				assert_eq!(actual, result);
			}
			assert_eq!(mirror.len(), queue.len());
			assert_eq!(mirror.last(), queue.peek());
		}
		while let Some(result) = queue.pop() {
			assert_eq!(mirror.pop(), Some(result));
		}
		assert!(mirror.is_empty());
	}
	#[test]
	fn empty_iff_zero_len() {
		let mut queue = PriorityQueue::new(|a: &u8, b: &u8| a > b);
		assert!(queue.is_empty());
		assert_eq!(0, queue.len());
		let result = queue.push(5);
		assert_eq!(1, result);
		assert!(!queue.is_empty());
		queue.pop();
		assert!(queue.is_empty());
		assert_eq!(None, queue.pop());
		assert_eq!(None, queue.peek());
	}
	#[test]
	fn duplicates_retained() {
		let mut queue = PriorityQueue::new(|a: &u8, b: &u8| a > b);
		let result = queue.push_all([2, 2, 2]);
		let actual = 3;
		assert_eq!(actual, result);
	}
	#[test]
	fn replace_returns_old_top() {
		let mut queue = PriorityQueue::new(|a: &u8, b: &u8| a > b);
		queue.push_all([5, 3, 8]);
		let result = queue.replace(1);
		assert_eq!(Some(8), result);
		assert_eq!(Some(&5), queue.peek());
		assert_eq!(3, queue.len());
	}
	#[test]
	fn replace_on_empty_pushes() {
		let mut queue = PriorityQueue::new(|a: &u8, b: &u8| a > b);
		let result = queue.replace(4);
		assert_eq!(None, result);
		assert_eq!(Some(&4), queue.peek());
	}
}
