use std::cell::RefCell;
use std::rc::Rc;

use strata_core::prelude::*;
use strata_devtools::Inspector;
use strata_ui::*;

fn field(root: &Node, key: &str) -> anyhow::Result<Node> {
    root.get(key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("form has no field '{key}'"))
}

fn app(root: &Node, after_save: Rc<dyn Fn(&Node)>) -> anyhow::Result<View> {
    let name = make_bindable(controls::text_input, None);
    let agree = make_bindable(controls::checkbox, Some("checked"));
    let volume = make_bindable(controls::slider, None);

    let greeting = format!(
        "Hello, {}",
        field(root, "name")?.as_text().filter(|s| !s.is_empty()).unwrap_or("stranger")
    );

    Ok(Column().child(vec![
        Text(greeting),
        name.render(BindProps::new(field(root, "name")?).prop("hint", "Your name"))?,
        agree.render(
            BindProps::new(field(root, "agree")?)
                .prop("label", "Subscribe")
                .after_change(move |v| after_save(v)),
        )?,
        volume.render(
            BindProps::new(field(root, "volume")?)
                .prop("min", 0)
                .prop("max", 100)
                .prop("label", "Volume"),
        )?,
    ]))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = Store::new(
        "form",
        record! { "name" => "", "agree" => false, "volume" => 40.0 },
    );
    let inspector = Inspector::attach(&store);
    inspector.borrow_mut().hud.toggle_inspector();

    let saved: Rc<dyn Fn(&Node)> = Rc::new(|v: &Node| log::info!("subscription saved: {v:?}"));
    let frame = Rc::new(RefCell::new(app(&store.state(), saved.clone())?));
    {
        let frame = frame.clone();
        let saved = saved.clone();
        store.subscribe(move |root, action| {
            log::info!("re-render after {}", action.label);
            match app(root, saved.clone()) {
                Ok(view) => *frame.borrow_mut() = view,
                Err(e) => log::error!("render failed: {e}"),
            }
        });
    }

    // Scripted input, as a platform runner would deliver it.
    for event in [
        ControlEvent::Text("Ada".into()),
        ControlEvent::Toggle(true),
        ControlEvent::Slide(75.0),
    ] {
        let view = frame.borrow().clone();
        view.dispatch(&event);
    }

    // Programmatic write outside any control.
    let volume = field(&store.state(), "volume")?;
    update(&volume, |v| Node::from(v.as_f64().unwrap_or(0.0) / 2.0), Some("halve volume"))?;
    store.sync();

    let live = get_responsive_state(&store.state())?;
    log::info!(
        "name={:?} agree={:?} volume={:?}",
        live.key("name").as_text(),
        live.key("agree").as_bool(),
        live.key("volume").as_f64()
    );

    let inspector = inspector.borrow();
    for entry in inspector.log.entries() {
        log::info!("#{} {} ({})", entry.seq, entry.label, entry.kind);
    }
    let framed = inspector.frame(frame.borrow().clone());
    if let Some(ViewKind::Text { text }) = framed.children.last().map(|v| &v.kind) {
        println!("{text}");
    }
    Ok(())
}
