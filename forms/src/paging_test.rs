use super::*;

#[test]
fn total_pages_is_ceiling() {
    let rows: Vec<u32> = (0..17).collect();
    let page = paginate(&rows, 1, DEFAULT_PAGE_SIZE);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 17);
    assert_eq!(page.items, &rows[0..8]);
}

#[test]
fn last_page_is_partial() {
    let rows: Vec<u32> = (0..17).collect();
    let page = paginate(&rows, 3, 8);
    assert_eq!(page.items, &[16]);
    assert!(page.has_previous());
    assert!(!page.has_next());
}

#[test]
fn out_of_range_pages_clamp() {
    let rows: Vec<u32> = (0..10).collect();
    assert_eq!(paginate(&rows, 0, 8).page, 1);
    let last = paginate(&rows, 99, 8);
    assert_eq!(last.page, 2);
    assert_eq!(last.items, &[8, 9]);
}

#[test]
fn empty_list_has_no_pages() {
    let rows: Vec<u32> = Vec::new();
    let page = paginate(&rows, 1, 8);
    assert_eq!((page.page, page.total_pages), (1, 0));
    assert!(page.items.is_empty());
    assert!(!page.has_next());
}

#[test]
fn zero_page_size_means_one_per_page() {
    let rows = [1, 2, 3];
    let page = paginate(&rows, 2, 0);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items, &[2]);
}
