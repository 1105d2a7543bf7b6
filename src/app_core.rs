use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{self, ApiError};
use folio_core::{
    distinct_categories, filter_choices, filter_works, Category, FetchOutcome, FilterChoice, Work,
    WorkCache,
};

pub(crate) type PortfolioSubscriber = Rc<dyn Fn()>;

/// Page-level state shared by the public gallery, the filter bar and the
/// modal: the works cache and the selected filter.
pub(crate) struct PortfolioCore {
    api_base: String,
    cache: RefCell<WorkCache>,
    filter: RefCell<FilterChoice>,
    subscribers: Rc<RefCell<Vec<PortfolioSubscriber>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PortfolioSnapshot {
    pub(crate) loaded: bool,
    pub(crate) works: Rc<[Work]>,
    pub(crate) visible: Rc<[Work]>,
    pub(crate) categories: Rc<[Category]>,
    pub(crate) filter: FilterChoice,
}

impl PortfolioSnapshot {
    fn empty(filter: FilterChoice) -> Self {
        Self {
            loaded: false,
            works: Rc::from(Vec::<Work>::new()),
            visible: Rc::from(Vec::<Work>::new()),
            categories: Rc::from(Vec::<Category>::new()),
            filter,
        }
    }

    pub(crate) fn choices(&self) -> Vec<FilterChoice> {
        filter_choices(&self.works)
    }
}

impl PortfolioCore {
    pub(crate) fn new(api_base: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            api_base: api_base.into(),
            cache: RefCell::new(WorkCache::new()),
            filter: RefCell::new(FilterChoice::All),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn api_base(&self) -> &str {
        &self.api_base
    }

    pub(crate) fn subscribe(&self, subscriber: PortfolioSubscriber) -> PortfolioSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        PortfolioSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    pub(crate) fn snapshot(&self) -> PortfolioSnapshot {
        let works = self.cache.borrow().get();
        let filter = self.filter.borrow().clone();
        let Some(works) = works else {
            return PortfolioSnapshot::empty(filter);
        };
        let visible: Rc<[Work]> = filter_works(&works, &filter).into();
        let categories: Rc<[Category]> = distinct_categories(&works).into();
        PortfolioSnapshot {
            loaded: true,
            works,
            visible,
            categories,
            filter,
        }
    }

    /// Cached works, fetching them first when the slot is empty.
    pub(crate) async fn works(&self) -> Result<Rc<[Work]>, ApiError> {
        if let Some(works) = self.cache.borrow().get() {
            return Ok(works);
        }
        self.fetch().await
    }

    /// Drops the cache and refetches; every subscriber re-renders.
    pub(crate) async fn refresh(&self) -> Result<Rc<[Work]>, ApiError> {
        self.cache.borrow_mut().invalidate();
        self.fetch().await
    }

    /// A superseded fetch fails with `ApiError::Superseded`; the newer fetch
    /// that replaced it notifies subscribers when it lands.
    async fn fetch(&self) -> Result<Rc<[Work]>, ApiError> {
        let ticket = self.cache.borrow_mut().begin_fetch();
        let fetched = api::fetch_works(&self.api_base).await?;
        let outcome = self.cache.borrow_mut().settle(ticket, fetched);
        match outcome {
            FetchOutcome::Stored(works) => {
                gloo::console::log!("works loaded", works.len() as u32);
                self.notify();
                Ok(works)
            }
            FetchOutcome::Cached(works) => Ok(works),
            FetchOutcome::Superseded => {
                gloo::console::log!("works response superseded");
                Err(ApiError::Superseded)
            }
        }
    }

    /// Fills the cache without a request.
    #[cfg(test)]
    pub(crate) fn prime(&self, works: Vec<Work>) {
        self.cache.borrow_mut().store(works);
        self.notify();
    }

    pub(crate) fn select_filter(&self, choice: FilterChoice) {
        {
            let mut filter = self.filter.borrow_mut();
            if *filter == choice {
                return;
            }
            *filter = choice;
        }
        self.notify();
    }
}

pub(crate) struct PortfolioSubscription {
    subscriber: PortfolioSubscriber,
    subscribers: Rc<RefCell<Vec<PortfolioSubscriber>>>,
}

impl Drop for PortfolioSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
