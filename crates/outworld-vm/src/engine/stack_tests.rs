use super::stack::{CallStack, STACK_DEPTH};

#[test]
fn push_pop_is_lifo() {
    let mut stack = CallStack::new();
    stack.push(0x0010).unwrap();
    stack.push(0x0020).unwrap();

    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.pop(), Some(0x0020));
    assert_eq!(stack.pop(), Some(0x0010));
    assert!(stack.is_empty());
}

#[test]
fn pop_on_empty_stack() {
    let mut stack = CallStack::new();
    assert_eq!(stack.pop(), None);
    assert_eq!(stack.depth(), 0);
}

#[test]
fn push_past_capacity_fails() {
    let mut stack = CallStack::new();
    for i in 0..STACK_DEPTH {
        assert!(stack.push(i as u16).is_some(), "push {i}");
    }
    assert_eq!(stack.push(0xffff), None);
    assert_eq!(stack.depth(), STACK_DEPTH);
    assert_eq!(stack.pop(), Some((STACK_DEPTH - 1) as u16));
}

#[test]
fn clear_empties_the_stack() {
    let mut stack = CallStack::new();
    stack.push(1).unwrap();
    stack.clear();
    assert!(stack.is_empty());
    assert_eq!(stack, CallStack::new());
}
