//! Module provide ordered-set implemented by [Avl] type.
//!
//! Avl is implemented using [AVL][wiki-avl] height balancing.
//!
//! - Each entry in Avl instance correspond to a unique key.
//! - Parametrised over `key-type`.
//! - Membership operations, via insert(), search() api.
//! - Uses ownership model and borrow semantics to ensure safety.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Every node carries the height of its subtree, height of a leaf
//! node is 1 and height of a missing subtree is 0. After every insert
//! the difference in height between the left and right subtree of any
//! node stays within {-1, 0, 1}, restored where needed by single or
//! double rotations on the way back up the insert recursion.
//!
//! Constructing a new [Avl] instance:
//! ```
//! use obst::Avl;
//!
//! let mut index: Avl<u64> = Avl::new();
//!
//! assert_eq!(index.insert(10), true);
//! assert_eq!(index.insert(10), false);
//! assert_eq!(index.search(&10), true);
//! assert_eq!(index.search(&20), false);
//! ```
//!
//! [wiki-avl]: https://en.wikipedia.org/wiki/AVL_tree

use std::{
    borrow::Borrow,
    cmp,
    cmp::{Ord, Ordering},
    fmt,
};

use crate::{Error, Result, MAX_TREE_DEPTH};

/// Avl manage a single instance of in-memory ordered-set using
/// [avl][avl] tree.
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
pub struct Avl<K> {
    root: Option<Box<Node<K>>>,
}

impl<K> Avl<K> {
    /// Create an empty instance of Avl.
    pub fn new() -> Avl<K> {
        Avl { root: None }
    }
}

impl<K> Avl<K> {
    /// Insert key into this instance. Return true if key was newly
    /// added, false if an equal key already exists, in which case the
    /// tree is left untouched.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let (root, inserted) = Self::do_insert(self.root.take(), key);
        self.root = Some(root);
        inserted
    }

    /// Check whether key exists in this instance.
    pub fn search<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.as_right_ref(),
                Ordering::Greater => nref.as_left_ref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Validate AVL tree with following rules:
    ///
    /// * Make sure that the height stored in each node agrees with
    ///   its subtrees.
    /// * Difference in height between left and right subtree of any
    ///   node must be within {-1, 0, 1}.
    /// * Make sure keys are in sorted order.
    /// * Make sure that the maximum depth do not exceed MAX_TREE_DEPTH.
    pub fn validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        Self::validate_tree(self.root.as_deref(), 1 /*depth*/)?;
        Ok(())
    }
}

type Insert<K> = (Box<Node<K>>, bool);

impl<K> Avl<K> {
    fn do_insert(node: Option<Box<Node<K>>>, key: K) -> Insert<K>
    where
        K: Ord,
    {
        let mut node = match node {
            Some(node) => node,
            None => return (Box::new(Node::new(key)), true),
        };

        match node.key.cmp(&key) {
            Ordering::Greater => {
                let (left, inserted) = Self::do_insert(node.left.take(), key);
                node.left = Some(left);
                (rebalance(node), inserted)
            }
            Ordering::Less => {
                let (right, inserted) = Self::do_insert(node.right.take(), key);
                node.right = Some(right);
                (rebalance(node), inserted)
            }
            Ordering::Equal => (node, false),
        }
    }

    fn validate_tree(node: Option<&Node<K>>, depth: usize) -> Result<i8>
    where
        K: Ord + fmt::Debug,
    {
        let node = match node {
            Some(node) => node,
            None => return Ok(0),
        };

        if depth > MAX_TREE_DEPTH {
            err_at!(Fatal, msg: "tree exceeds max_depth {}", depth)?;
        }

        let (left, right) = (node.as_left_ref(), node.as_right_ref());

        // confirm sort order in the tree.
        if let Some(left) = left {
            if left.key.ge(&node.key) {
                let (lk, nk) = (&left.key, &node.key);
                err_at!(Fatal, msg: "sort order left:{:?}, parent:{:?}", lk, nk)?;
            }
        }
        if let Some(right) = right {
            if right.key.le(&node.key) {
                let (rk, nk) = (&right.key, &node.key);
                err_at!(Fatal, msg: "sort order right:{:?}, parent:{:?}", rk, nk)?;
            }
        }

        let lh = Self::validate_tree(left, depth + 1)?;
        let rh = Self::validate_tree(right, depth + 1)?;

        if node.height != 1 + cmp::max(lh, rh) {
            let h = node.height;
            err_at!(Fatal, msg: "stale height {} for subtrees {} {}", h, lh, rh)?;
        }
        if (rh - lh).abs() > 1 {
            err_at!(Fatal, msg: "unbalanced heights l:{}, r:{}", lh, rh)?;
        }

        Ok(node.height)
    }
}

//--------- rotation routines for height balancing ----------------

fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.fix_height();
    match node.balance_factor() {
        2 => {
            // right heavy, turn a zig-zag shape into zig-zig first.
            if node.right.as_ref().unwrap().balance_factor() < 0 {
                node.right = Some(rotate_right(node.right.take().unwrap()));
            }
            rotate_left(node)
        }
        -2 => {
            // left heavy, mirror of above.
            if node.left.as_ref().unwrap().balance_factor() > 0 {
                node.left = Some(rotate_left(node.left.take().unwrap()));
            }
            rotate_right(node)
        }
        _ => node,
    }
}

//              (i)                       (i)
//               |                         |
//              node                     pivot
//              /  \                      / \
//             /    \                    /   \
//          left   pivot              node    pr
//                  / \               /  \
//                pl   pr          left   pl
//
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut pivot = match node.right.take() {
        Some(pivot) => pivot,
        None => panic!("rotateleft(): missing right child ? call the programmer"),
    };
    node.right = pivot.left.take();
    node.fix_height();
    pivot.left = Some(node);
    pivot.fix_height();
    pivot
}

//              (i)                       (i)
//               |                         |
//              node                     pivot
//              /  \                      / \
//             /    \                    /   \
//          pivot  right               pl    node
//           / \                             /  \
//         pl   pr                          pr   right
//
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut pivot = match node.left.take() {
        Some(pivot) => pivot,
        None => panic!("rotateright(): missing left child ? call the programmer"),
    };
    node.left = pivot.right.take();
    node.fix_height();
    pivot.right = Some(node);
    pivot.fix_height();
    pivot
}

// Node corresponds to a single entry in Avl instance.
pub struct Node<K> {
    key: K,
    height: i8,                     // store: height of this subtree
    left: Option<Box<Node<K>>>,     // store: left child
    right: Option<Box<Node<K>>>,    // store: right child
}

impl<K> Node<K> {
    fn new(key: K) -> Node<K> {
        Node {
            key,
            height: 1,
            left: None,
            right: None,
        }
    }

    #[inline]
    fn as_left_ref(&self) -> Option<&Node<K>> {
        self.left.as_deref()
    }

    #[inline]
    fn as_right_ref(&self) -> Option<&Node<K>> {
        self.right.as_deref()
    }

    #[inline]
    fn fix_height(&mut self) {
        let lh = height(self.as_left_ref());
        let rh = height(self.as_right_ref());
        self.height = 1 + cmp::max(lh, rh);
    }

    #[inline]
    fn balance_factor(&self) -> i8 {
        height(self.as_right_ref()) - height(self.as_left_ref())
    }
}

#[inline]
fn height<K>(node: Option<&Node<K>>) -> i8 {
    node.map_or(0, |node| node.height)
}

#[cfg(test)]
#[path = "avl_test.rs"]
mod avl_test;
