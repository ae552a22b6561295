#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

#[cfg(test)]
mod collection_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use logxml::test_utils::*;

    fn record(id: u64) -> EventRecord {
        EventRecord::new(id, vec![("type".into(), "INFO".to_string())])
    }

    #[derive(Default)]
    struct Counts {
        data: usize,
        selection: usize,
    }

    fn counting_observer(counts: &Rc<RefCell<Counts>>) -> impl FnMut(CollectionChange) {
        let counts = Rc::clone(counts);
        move |change| {
            let mut counts = counts.borrow_mut();
            match change {
                CollectionChange::DataChanged => counts.data += 1,
                CollectionChange::SelectionChanged => counts.selection += 1,
            }
        }
    }

    #[test]
    fn append_notifies_per_record_and_batch_notifies_once() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut collection = EventCollection::new();
        collection.add_observer(counting_observer(&counts));

        collection.append(record(0));
        collection.append(record(1));
        assert_eq!(counts.borrow().data, 2);

        collection.append_batch(vec![record(2), record(3), record(4)]);
        assert_eq!(counts.borrow().data, 3);
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn selection_notifications_are_distinct_from_data_notifications() -> Result<()> {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut collection = EventCollection::new();
        collection.add_observer(counting_observer(&counts));

        collection.append(record(0));
        collection.set_current_index(Some(0))?;
        collection.set_current_index(None)?;

        assert_eq!(counts.borrow().data, 1);
        assert_eq!(counts.borrow().selection, 2);
        Ok(())
    }

    #[test]
    fn duplicate_observers_are_notified_twice() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut collection = EventCollection::new();
        collection.add_observer(counting_observer(&counts));
        collection.add_observer(counting_observer(&counts));

        collection.append(record(0));
        assert_eq!(counts.borrow().data, 2);
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut collection = EventCollection::new();
        collection.append(record(0));

        let err = collection.set_current_index(Some(5)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ParseErrorKind::Collection(CollectionError::SelectionOutOfRange { .. })
        ));
        // A failed set leaves the cursor untouched.
        assert_eq!(collection.current_index(), None);
    }

    #[test]
    fn clear_empties_and_resets_cursor_with_one_notification() -> Result<()> {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut collection = EventCollection::new();
        collection.append_batch(vec![record(0), record(1)]);
        collection.set_current_index(Some(1))?;
        collection.add_observer(counting_observer(&counts));

        collection.clear();
        assert!(collection.is_empty());
        assert_eq!(collection.current_index(), None);
        assert_eq!(counts.borrow().data, 1);
        Ok(())
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut collection = EventCollection::new();
        collection.append(record(0));

        assert!(collection.get(0).is_ok());
        let err = collection.get(1).unwrap_err();
        match err.kind() {
            ParseErrorKind::Collection(CollectionError::IndexOutOfRange { index, len }) => {
                assert_eq!(*index, 1);
                assert_eq!(*len, 1);
            }
            other => panic!("Expected index error, got {:?}", other),
        }
    }

    #[test]
    fn empty_batch_append_does_not_notify() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut collection = EventCollection::new();
        collection.add_observer(counting_observer(&counts));

        collection.append_batch(Vec::new());
        assert_eq!(counts.borrow().data, 0);
    }
}
