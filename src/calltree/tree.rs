use super::node::CallTreeNode;
use crate::error::CallTreeError;
use crate::split::Split;

/// Notified once per completed top-level call.
pub trait CallTreeListener {
    fn on_root_stop(&self, root: &CallTreeNode, split: &Split);
}

impl<F> CallTreeListener for F
where
    F: Fn(&CallTreeNode, &Split),
{
    fn on_root_stop(&self, root: &CallTreeNode, split: &Split) {
        self(root, split)
    }
}

/// Active call path of one execution context.
///
/// The tree is created by the first `start` while idle and handed back by
/// the `stop` that empties the stack, leaving the context idle again. A
/// `CallTree` belongs to exactly one context and is never shared, so it
/// needs no locking; the host must deliver that context's events in nested
/// order.
#[derive(Debug, Default)]
pub struct CallTree {
    root: Option<CallTreeNode>,
    /// Child indices from the root down to the top of the stack
    path: Vec<usize>,
}

impl CallTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.root.is_none()
    }

    /// Number of calls currently open.
    pub fn depth(&self) -> usize {
        if self.root.is_some() {
            self.path.len() + 1
        } else {
            0
        }
    }

    /// Open a call named `name` beneath the current top of stack.
    pub fn start(&mut self, name: &str) {
        if self.root.is_none() {
            self.root = Some(CallTreeNode::new(name));
            return;
        }
        if let Some(top) = self.top_mut() {
            let child = top.child_index(name);
            self.path.push(child);
        }
    }

    /// Close the top call and record `split` on it.
    ///
    /// Returns the completed tree when this closed the root call. A stop on
    /// an idle context is reported and changes nothing.
    pub fn stop(&mut self, split: Split) -> Result<Option<CallTreeNode>, CallTreeError> {
        let top = self.top_mut().ok_or(CallTreeError::NoActiveCall)?;
        top.add_split(split);
        if self.path.pop().is_none() {
            return Ok(self.root.take());
        }
        Ok(None)
    }

    /// [`stop`](Self::stop), then notify `listener` if the root completed.
    /// The context is already idle when the listener runs.
    pub fn stop_and_notify<L>(&mut self, split: Split, listener: &L) -> Result<Option<CallTreeNode>, CallTreeError>
    where
        L: CallTreeListener + ?Sized,
    {
        let completed = self.stop(split)?;
        if let Some(root) = &completed {
            listener.on_root_stop(root, &split);
        }
        Ok(completed)
    }

    fn top_mut(&mut self) -> Option<&mut CallTreeNode> {
        let mut node = self.root.as_mut()?;
        for &i in &self.path {
            node = node.child_at_mut(i);
        }
        Some(node)
    }
}
