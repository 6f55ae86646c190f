use std::cell::RefCell;
use std::collections::VecDeque;

type Continuation = Box<dyn FnOnce()>;

/// A cooperative, single-threaded queue of continuations.
///
/// Fetchers complete their requests by deferring the completion here instead
/// of invoking it in place, which gives the host a single point to drive all
/// asynchronous completions from, usually once per frame.
#[derive(Default)]
pub struct Dispatcher {
    last_frame_tasks: RefCell<VecDeque<Continuation>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            last_frame_tasks: RefCell::new(VecDeque::new()),
        }
    }

    /// Queues a continuation which will be executed on the next `advance`.
    #[inline]
    pub fn defer<T>(&self, func: T)
    where
        T: FnOnce() + 'static,
    {
        self.last_frame_tasks.borrow_mut().push_back(Box::new(func));
    }

    /// Executes every continuation queued before this call. Continuations
    /// deferred while advancing are kept for the next frame.
    ///
    /// Returns the number of executed continuations.
    pub fn advance(&self) -> usize {
        let tasks: Vec<Continuation> = self.last_frame_tasks.borrow_mut().drain(..).collect();
        let num = tasks.len();

        for func in tasks {
            func();
        }

        num
    }

    /// Advances until no continuation is left.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let num = self.advance();
            if num == 0 {
                return total;
            }

            total += num;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.last_frame_tasks.borrow().len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.last_frame_tasks.borrow().is_empty()
    }
}
