use bigdecimal::{BigDecimal, Zero};

use super::order::{NewOrderLine, OrderTotals};

pub fn line_total(price: &BigDecimal, quantity: i32) -> BigDecimal {
    price * &BigDecimal::from(quantity)
}

pub fn subtotal(lines: &[NewOrderLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::zero(), |acc, l| acc + line_total(&l.price, l.quantity))
}

pub fn totals(subtotal: BigDecimal, discount: BigDecimal, delivery_fee: BigDecimal) -> OrderTotals {
    let final_amount = &subtotal - &discount + &delivery_fee;
    OrderTotals {
        subtotal,
        discount_amount: discount,
        delivery_fee,
        final_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn line(price: &str, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            product_id: Uuid::new_v4(),
            quantity,
            price: dec(price),
        }
    }

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let lines = vec![line("120000", 2), line("35000.50", 1)];
        assert_eq!(subtotal(&lines), dec("275000.50"));
    }

    #[test]
    fn empty_cart_has_zero_subtotal() {
        assert_eq!(subtotal(&[]), BigDecimal::zero());
    }

    #[test]
    fn final_amount_is_subtotal_minus_discount_plus_delivery() {
        let t = totals(dec("300000"), dec("30000"), dec("25000"));
        assert_eq!(t.final_amount, dec("295000"));
        assert_eq!(t.subtotal, dec("300000"));
    }
}
