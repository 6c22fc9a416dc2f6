mod change_event;
