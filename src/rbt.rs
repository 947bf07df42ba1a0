//! Module provide ordered-set implemented by [Rbt] type.
//!
//! Rbt is implemented using [red-black][wiki-rbt] color balancing.
//!
//! - Each entry in Rbt instance correspond to a unique key.
//! - Parametrised over `key-type`.
//! - Membership operations, via insert(), search() api.
//! - Uses ownership model and borrow semantics to ensure safety.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Nodes live in an arena, a flat vector owned by the Rbt instance,
//! and refer to each other by u32 offsets. The parent offset is a
//! non-owning back-reference, used only to walk upward during the
//! insert fixup, ownership runs strictly from parent to child. Every
//! insert attaches a red leaf and then restores two rules on the way
//! up: the root is black, and a red node never has a red child. Along
//! with a uniform black count on every root-to-leaf path, this keeps
//! the height within ``2 * log2(n+1)``.
//!
//! Constructing a new [Rbt] instance:
//! ```
//! use obst::Rbt;
//!
//! let mut index: Rbt<u64> = Rbt::new();
//!
//! assert_eq!(index.insert(10), true);
//! assert_eq!(index.insert(10), false);
//! assert_eq!(index.search(&10), true);
//! assert_eq!(index.search(&20), false);
//! ```
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    convert::TryFrom,
    fmt,
};

use crate::{Error, Result, MAX_TREE_DEPTH};

/// Rbt manage a single instance of in-memory ordered-set using
/// [red-black][rbt] tree.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct Rbt<K> {
    nodes: Vec<Node<K>>, // arena, never freed until the instance drops
    root: Option<u32>,
}

impl<K> Rbt<K> {
    /// Create an empty instance of Rbt.
    pub fn new() -> Rbt<K> {
        Rbt {
            nodes: Vec::default(),
            root: None,
        }
    }
}

impl<K> Rbt<K> {
    /// Insert key into this instance. Return true if key was newly
    /// added, false if an equal key already exists, in which case the
    /// tree is left untouched.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        match self.root {
            None => {
                let off = self.new_node(key, true /*black*/, None);
                self.root = Some(off);
                true
            }
            Some(off) => match self.do_insert(off, key) {
                Some(root) => {
                    self.root = Some(root);
                    true
                }
                None => false,
            },
        }
    }

    /// Check whether key exists in this instance.
    pub fn search<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(off) = node {
            let nref = &self.nodes[off as usize];
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right,
                Ordering::Greater => nref.left,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root node must be black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Parent back-reference of every child points to its parent.
    /// * Make sure keys are in sorted order.
    /// * Make sure that the maximum depth do not exceed MAX_TREE_DEPTH.
    pub fn validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        if self.is_red(self.root) {
            err_at!(Fatal, msg: "root node must be black")?;
        }
        if let Some(off) = self.root {
            if self.nodes[off as usize].parent.is_some() {
                err_at!(Fatal, msg: "root node with a parent link")?;
            }
        }
        self.validate_tree(self.root, false /*fromred*/, 0 /*n_blacks*/, 1)?;
        Ok(())
    }
}

impl<K> Rbt<K> {
    fn do_insert(&mut self, off: u32, key: K) -> Option<u32>
    where
        K: Ord,
    {
        match self.nodes[off as usize].key.cmp(&key) {
            Ordering::Greater => match self.nodes[off as usize].left {
                Some(left) => self.do_insert(left, key),
                None => {
                    let leaf = self.new_node(key, false /*red*/, Some(off));
                    self.nodes[off as usize].left = Some(leaf);
                    Some(self.balance(leaf))
                }
            },
            Ordering::Less => match self.nodes[off as usize].right {
                Some(right) => self.do_insert(right, key),
                None => {
                    let leaf = self.new_node(key, false /*red*/, Some(off));
                    self.nodes[off as usize].right = Some(leaf);
                    Some(self.balance(leaf))
                }
            },
            Ordering::Equal => None,
        }
    }

    // Fixup starting from a freshly colored red node, walking toward
    // the root via parent links. Return the offset of the tree's root
    // once no red-red violation remains.
    fn balance(&mut self, k: u32) -> u32 {
        let p = match self.nodes[k as usize].parent {
            Some(p) => p,
            None => {
                self.nodes[k as usize].black = true;
                return k;
            }
        };

        if self.nodes[p as usize].black {
            return self.top_from(p);
        }

        // red child under a red parent. root is always black, so the
        // grandparent must exist.
        let g = match self.nodes[p as usize].parent {
            Some(g) => g,
            None => panic!("balance(): red node at root ? call the programmer"),
        };

        let k_left = self.nodes[p as usize].left == Some(k);
        let p_left = self.nodes[g as usize].left == Some(p);
        let uncle = if p_left {
            self.nodes[g as usize].right
        } else {
            self.nodes[g as usize].left
        };

        match uncle {
            Some(u) if !self.nodes[u as usize].black => {
                // red uncle, recolor and push the violation one level up.
                self.nodes[p as usize].black = true;
                self.nodes[u as usize].black = true;
                self.nodes[g as usize].black = false;
                self.balance(g)
            }
            _ => {
                // black or missing uncle, rotate the violation away.
                // an inner grandchild is first rotated out to line up
                // with its parent, then the grandparent rotates over.
                self.nodes[g as usize].black = false;
                let gp = self.nodes[g as usize].parent;
                let sub = if p_left {
                    if k_left {
                        self.nodes[p as usize].black = true;
                    } else {
                        self.nodes[k as usize].black = true;
                        let pivot = self.rotate_left(p);
                        self.nodes[g as usize].left = Some(pivot);
                    }
                    self.rotate_right(g)
                } else {
                    if !k_left {
                        self.nodes[p as usize].black = true;
                    } else {
                        self.nodes[k as usize].black = true;
                        let pivot = self.rotate_right(p);
                        self.nodes[g as usize].right = Some(pivot);
                    }
                    self.rotate_left(g)
                };
                match gp {
                    Some(gp) => {
                        if self.nodes[gp as usize].left == Some(g) {
                            self.nodes[gp as usize].left = Some(sub);
                        } else {
                            self.nodes[gp as usize].right = Some(sub);
                        }
                        self.top_from(gp)
                    }
                    None => sub,
                }
            }
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
    // caller relinks pivot into (i), or makes it the root.
    fn rotate_left(&mut self, off: u32) -> u32 {
        let pivot = match self.nodes[off as usize].right {
            Some(pivot) => pivot,
            None => panic!("rotateleft(): missing right child ? call the programmer"),
        };
        self.nodes[pivot as usize].parent = self.nodes[off as usize].parent;
        let pl = self.nodes[pivot as usize].left;
        self.nodes[off as usize].right = pl;
        if let Some(pl) = pl {
            self.nodes[pl as usize].parent = Some(off);
        }
        self.nodes[pivot as usize].left = Some(off);
        self.nodes[off as usize].parent = Some(pivot);
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
    // caller relinks pivot into (i), or makes it the root.
    fn rotate_right(&mut self, off: u32) -> u32 {
        let pivot = match self.nodes[off as usize].left {
            Some(pivot) => pivot,
            None => panic!("rotateright(): missing left child ? call the programmer"),
        };
        self.nodes[pivot as usize].parent = self.nodes[off as usize].parent;
        let pr = self.nodes[pivot as usize].right;
        self.nodes[off as usize].left = pr;
        if let Some(pr) = pr {
            self.nodes[pr as usize].parent = Some(off);
        }
        self.nodes[pivot as usize].right = Some(off);
        self.nodes[off as usize].parent = Some(pivot);
        pivot
    }

    fn top_from(&self, mut off: u32) -> u32 {
        while let Some(parent) = self.nodes[off as usize].parent {
            off = parent;
        }
        off
    }

    fn new_node(&mut self, key: K, black: bool, parent: Option<u32>) -> u32 {
        let off = match u32::try_from(self.nodes.len()) {
            Ok(off) => off,
            Err(_) => panic!("newnode(): arena exceeds u32 offsets"),
        };
        self.nodes.push(Node {
            key,
            black,
            parent,
            left: None,
            right: None,
        });
        off
    }

    fn validate_tree(
        &self,
        node: Option<u32>,
        fromred: bool,
        mut n_blacks: usize,
        depth: usize,
    ) -> Result<usize>
    where
        K: Ord + fmt::Debug,
    {
        let off = match node {
            Some(off) => off,
            None => return Ok(n_blacks),
        };

        let red = self.is_red(node);
        if fromred && red {
            err_at!(Fatal, msg: "consecutive reds")?;
        }
        if depth > MAX_TREE_DEPTH {
            err_at!(Fatal, msg: "tree exceeds max_depth {}", depth)?;
        }

        let nref = &self.nodes[off as usize];
        let (left, right) = (nref.left, nref.right);

        // confirm parent back-references and sort order in the tree.
        if let Some(left) = left {
            let lref = &self.nodes[left as usize];
            if lref.parent != Some(off) {
                err_at!(Fatal, msg: "broken parent link under {:?}", nref.key)?;
            }
            if lref.key.ge(&nref.key) {
                let (lk, nk) = (&lref.key, &nref.key);
                err_at!(Fatal, msg: "sort order left:{:?}, parent:{:?}", lk, nk)?;
            }
        }
        if let Some(right) = right {
            let rref = &self.nodes[right as usize];
            if rref.parent != Some(off) {
                err_at!(Fatal, msg: "broken parent link under {:?}", nref.key)?;
            }
            if rref.key.le(&nref.key) {
                let (rk, nk) = (&rref.key, &nref.key);
                err_at!(Fatal, msg: "sort order right:{:?}, parent:{:?}", rk, nk)?;
            }
        }

        if !red {
            n_blacks += 1;
        }
        let lblacks = self.validate_tree(left, red, n_blacks, depth + 1)?;
        let rblacks = self.validate_tree(right, red, n_blacks, depth + 1)?;
        if lblacks != rblacks {
            err_at!(Fatal, msg: "unbalanced blacks l:{}, r:{}", lblacks, rblacks)?;
        }

        Ok(lblacks)
    }

    #[inline]
    fn is_red(&self, node: Option<u32>) -> bool {
        node.map_or(false, |off| !self.nodes[off as usize].black)
    }
}

// Node corresponds to a single entry in Rbt instance, addressed by
// its u32 offset into the arena.
pub struct Node<K> {
    key: K,
    black: bool,         // store: black or red
    parent: Option<u32>, // store: non-owning link to parent node
    left: Option<u32>,   // store: left child
    right: Option<u32>,  // store: right child
}

#[cfg(test)]
#[path = "rbt_test.rs"]
mod rbt_test;
