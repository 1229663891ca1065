/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

/// Typed listener list for one event kind.
pub struct Observers<E> {
    next_id: u32,
    listeners: Vec<(ObserverId, Box<dyn FnMut(&E)>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are logged and ignored.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        match self.listeners.iter().position(|(l, _)| *l == id) {
            Some(idx) => {
                self.listeners.remove(idx);
                true
            }
            None => {
                log::warn!("observers: no listener registered under {:?}", id);
                false
            }
        }
    }

    /// Call every listener in subscription order.
    pub fn notify(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload of the per-frame render notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTick {
    pub frame: u64,
    pub day_number: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notify_reaches_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs: Observers<RenderTick> = Observers::new();
        let a = seen.clone();
        obs.subscribe(move |t| a.borrow_mut().push(("a", t.frame)));
        let b = seen.clone();
        obs.subscribe(move |t| b.borrow_mut().push(("b", t.frame)));

        obs.notify(&RenderTick { frame: 3, day_number: 0.0 });
        assert_eq!(*seen.borrow(), vec![("a", 3), ("b", 3)]);
    }

    #[test]
    fn unsubscribe_unknown_is_reported() {
        let mut obs: Observers<RenderTick> = Observers::new();
        let id = obs.subscribe(|_| {});
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        assert!(obs.is_empty());
    }
}
