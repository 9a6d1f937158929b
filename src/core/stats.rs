//! Per-course purchase counts

use crate::domain::{Course, Order, OrderStatus};
use std::collections::HashMap;

/// A course together with how many PAID orders reference it
#[derive(Debug, Clone, PartialEq)]
pub struct CoursePurchases {
    pub course: Course,
    pub successful: usize,
}

/// Count PAID orders per course, matched by course title
///
/// Every course appears in the result, in input order, with zero when no
/// paid order references it. Orders without a course are ignored.
pub fn successful_purchases(courses: &[Course], orders: &[Order]) -> Vec<CoursePurchases> {
    let mut by_title: HashMap<&str, usize> = HashMap::new();
    for order in orders.iter().filter(|o| o.status == OrderStatus::Paid) {
        if let Some(title) = order.course_title() {
            *by_title.entry(title).or_default() += 1;
        }
    }

    courses
        .iter()
        .map(|course| CoursePurchases {
            successful: by_title.get(course.title.as_str()).copied().unwrap_or(0),
            course: course.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseId, OrderId};

    fn course(title: &str) -> Course {
        Course::new(CourseId::new(format!("c-{title}")).unwrap(), title)
    }

    fn order(id: &str, status: OrderStatus, course_title: Option<&str>) -> Order {
        let mut builder = Order::builder().id(OrderId::new(id).unwrap()).status(status);
        if let Some(title) = course_title {
            builder = builder.course(course(title));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_counts_paid_orders_per_course() {
        let courses = vec![course("Algebra"), course("Physics"), course("Chemistry")];
        let orders = vec![
            order("1", OrderStatus::Paid, Some("Algebra")),
            order("2", OrderStatus::Paid, Some("Algebra")),
            order("3", OrderStatus::Unpaid, Some("Algebra")),
            order("4", OrderStatus::Paid, Some("Physics")),
            order("5", OrderStatus::Paid, None),
        ];

        let counts: Vec<(String, usize)> = successful_purchases(&courses, &orders)
            .into_iter()
            .map(|c| (c.course.title, c.successful))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("Algebra".to_string(), 2),
                ("Physics".to_string(), 1),
                ("Chemistry".to_string(), 0),
            ]
        );
    }
}
