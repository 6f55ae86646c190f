use std::cell::RefCell;
use std::rc::Rc;

use super::latch::{CountLatch, Latch};

/// A count-down join over a fixed number of slots. Every slot is filled by
/// exactly one completion; once the last slot is filled the finisher is
/// invoked with all values in slot order.
pub struct Join<T: 'static> {
    latch: CountLatch,
    slots: RefCell<Vec<Option<T>>>,
    finish: RefCell<Option<Box<dyn FnOnce(Vec<Option<T>>)>>>,
}

impl<T: 'static> Join<T> {
    pub fn new<F>(num: usize, finish: F) -> Rc<Self>
    where
        F: FnOnce(Vec<Option<T>>) + 'static,
    {
        let mut slots = Vec::with_capacity(num);
        slots.resize_with(num, || None);

        Rc::new(Join {
            latch: CountLatch::new(num),
            slots: RefCell::new(slots),
            finish: RefCell::new(Some(Box::new(finish))),
        })
    }

    /// Returns the completion which fills slot `index`.
    pub fn slot(self: &Rc<Self>, index: usize) -> Box<dyn FnOnce(T)> {
        let join = self.clone();
        Box::new(move |v| join.fill(index, v))
    }

    fn fill(&self, index: usize, value: T) {
        self.slots.borrow_mut()[index] = Some(value);
        self.latch.set();

        if self.latch.is_set() {
            let values: Vec<Option<T>> = self.slots.borrow_mut().drain(..).collect();
            let finish = self.finish.borrow_mut().take();
            if let Some(finish) = finish {
                finish(values);
            }
        }
    }
}
