//! Integration tests for filtering and pagination working together

use chrono::{TimeZone, Utc};
use orderdesk::core::filter::{apply_filters, DateRange, FilterCriteria};
use orderdesk::core::paginate::{page, total_pages, PageWindow};
use orderdesk::domain::{Course, CourseId, Order, OrderId, OrderStatus, PaymentType};

fn course(title: &str) -> Course {
    Course::new(CourseId::new(format!("c-{title}")).unwrap(), title)
}

fn order(id: &str, status: OrderStatus, course_title: &str, day: u32) -> Order {
    Order::builder()
        .id(OrderId::new(id).unwrap())
        .invoice_number(id.trim_start_matches('o'))
        .status(status)
        .payment_type(PaymentType::Payme)
        .course(course(course_title))
        .created_at(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap())
        .build()
        .unwrap()
}

/// Five orders, two of which are paid Algebra orders
fn algebra_fixture() -> Vec<Order> {
    vec![
        order("o1", OrderStatus::Paid, "Algebra", 1),
        order("o2", OrderStatus::Unpaid, "Algebra", 2),
        order("o3", OrderStatus::Paid, "Geometry", 3),
        order("o4", OrderStatus::Paid, "Algebra", 4),
        order("o5", OrderStatus::Cancelled, "Algebra", 5),
    ]
}

fn ids(orders: &[Order]) -> Vec<&str> {
    orders.iter().map(|o| o.id.as_str()).collect()
}

#[test]
fn test_paid_algebra_keeps_original_order() {
    let criteria = FilterCriteria::any()
        .with_status(OrderStatus::Paid)
        .with_course_title("Algebra");

    let filtered = apply_filters(&algebra_fixture(), &criteria);
    assert_eq!(ids(&filtered), vec!["o1", "o4"]);
}

#[test]
fn test_filter_is_idempotent() {
    let criteria = FilterCriteria::any().with_status(OrderStatus::Paid);
    let once = apply_filters(&algebra_fixture(), &criteria);
    let twice = apply_filters(&once, &criteria);
    assert_eq!(once, twice);
}

#[test]
fn test_whole_day_range_with_status() {
    let range = DateRange::whole_days(
        chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    )
    .unwrap();
    let criteria = FilterCriteria::any()
        .with_date_range(range)
        .with_status(OrderStatus::Paid);

    let filtered = apply_filters(&algebra_fixture(), &criteria);
    assert_eq!(ids(&filtered), vec!["o3", "o4"]);
}

#[test]
fn test_twenty_three_orders_in_pages_of_ten() {
    let orders: Vec<Order> = (1..=23)
        .map(|i| order(&format!("o{i}"), OrderStatus::Paid, "Algebra", 1))
        .collect();

    assert_eq!(total_pages(orders.len(), 10), 3);
    assert_eq!(page(&orders, 10, 1).len(), 10);
    assert_eq!(page(&orders, 10, 3).len(), 3);
    assert!(page(&orders, 10, 4).is_empty());
    assert_eq!(page(&orders, 10, 3)[0].id.as_str(), "o21");
}

#[test]
fn test_window_over_filtered_list() {
    let filtered = apply_filters(
        &algebra_fixture(),
        &FilterCriteria::any().with_course_title("Algebra"),
    );

    let mut window = PageWindow::new(3, filtered.len());
    assert_eq!(window.total_pages(), 2);
    assert_eq!(ids(window.slice(&filtered)), vec!["o1", "o2", "o4"]);

    assert!(window.go_to(2));
    assert_eq!(ids(window.slice(&filtered)), vec!["o5"]);

    // Past the end: stays on page 2
    assert!(!window.go_to(3));
    assert_eq!(window.current(), 2);
}

#[test]
fn test_empty_result_has_one_empty_page() {
    let filtered = apply_filters(
        &algebra_fixture(),
        &FilterCriteria::any().with_course_title("Physics"),
    );
    assert!(filtered.is_empty());

    let window = PageWindow::new(10, filtered.len());
    assert_eq!(window.total_pages(), 1);
    assert!(window.slice(&filtered).is_empty());
}
