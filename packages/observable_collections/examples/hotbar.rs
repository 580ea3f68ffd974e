//! An inventory hotbar that redraws itself whenever its slots change.

use observable_collections::ObservableArray;

fn render(slots: &[Option<&str>]) -> String {
    slots
        .iter()
        .map(|slot| slot.unwrap_or("_"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn main() {
    let mut hotbar = ObservableArray::new(5);

    hotbar.subscribe(|slots: &[Option<&str>]| println!("[ {} ]", render(slots)));

    hotbar.try_add("sword");
    hotbar.try_add("shield");
    hotbar.try_add_at(4, "potion");

    if !hotbar.try_add_at(4, "bomb") {
        println!("slot 4 is taken, bomb not added");
    }

    hotbar.swap(0, 2);
    hotbar.try_remove(&"shield");

    println!("{} of {} slots used", hotbar.count(), hotbar.len());
}
